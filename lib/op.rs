//! Local operator codes and strings thereof.
//!
//! An operator string is written left to right as an ordinary operator
//! product, e.g. `"+-"` on modes `(i, j)` is c<sup>†</sup><sub>*i*</sub>
//! c<sub>*j*</sub>. When applied to a ket, the rightmost operator acts first.

use std::fmt;
use thiserror::Error;

/// Returned by operator string construction or application.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// An operator code outside of `{I, n, z, +, -}`.
    #[error("operator code {op:?} at position {pos} not recognized")]
    InvalidOperator { op: char, pos: usize },

    #[error("length of operator string ({ops}) does not match number of indices ({indices})")]
    LengthMismatch { ops: usize, indices: usize },

    #[error("mode index {index} falls outside of a system of {n_modes} modes")]
    IndexOutOfRange { index: usize, n_modes: usize },
}
pub type OpResult<T> = Result<T, OpError>;

/// A single local operator acting on one mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Identity
    I,
    /// Number operator, *n*
    N,
    /// Polarization, *n* - 1/2
    Z,
    /// Raising (creation)
    Plus,
    /// Lowering (annihilation)
    Minus,
}

impl TryFrom<char> for Op {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'I' => Ok(Self::I),
            'n' => Ok(Self::N),
            'z' => Ok(Self::Z),
            '+' => Ok(Self::Plus),
            '-' => Ok(Self::Minus),
            _ => Err(c),
        }
    }
}

impl From<Op> for char {
    fn from(op: Op) -> Self {
        match op {
            Op::I => 'I',
            Op::N => 'n',
            Op::Z => 'z',
            Op::Plus => '+',
            Op::Minus => '-',
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl Op {
    /// Return the conjugate operator.
    pub fn dagger(self) -> Self {
        match self {
            Self::Plus => Self::Minus,
            Self::Minus => Self::Plus,
            x => x,
        }
    }
}

/// Check that `n_ops` operators are paired with as many indices and that all
/// indices address one of `n_modes` modes.
pub(crate) fn check_indices(n_ops: usize, indx: &[usize], n_modes: usize)
    -> OpResult<()>
{
    if n_ops != indx.len() {
        return Err(OpError::LengthMismatch { ops: n_ops, indices: indx.len() });
    }
    match indx.iter().find(|&&index| index >= n_modes) {
        Some(&index) => Err(OpError::IndexOutOfRange { index, n_modes }),
        None => Ok(()),
    }
}

/// An operator string paired with the modes each operator acts on, validated
/// against a fixed number of modes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpString {
    ops: Vec<Op>,
    indx: Vec<usize>,
    n_modes: usize,
}

impl fmt::Display for OpString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ops.iter().try_for_each(|op| op.fmt(f))?;
        write!(f, " [")?;
        for (k, i) in self.indx.iter().enumerate() {
            write!(f, "{}", i)?;
            if k < self.indx.len() - 1 { write!(f, ", ")?; }
        }
        write!(f, "]")
    }
}

impl OpString {
    /// Parse and validate a new operator string.
    pub fn new(opstr: &str, indx: &[usize], n_modes: usize)
        -> OpResult<Self>
    {
        let ops: Vec<Op>
            = opstr.chars()
            .enumerate()
            .map(|(pos, c)| {
                Op::try_from(c)
                    .map_err(|op| OpError::InvalidOperator { op, pos })
            })
            .collect::<OpResult<_>>()?;
        check_indices(ops.len(), indx, n_modes)?;
        Ok(Self { ops, indx: indx.to_vec(), n_modes })
    }

    /// Build directly from operators, validating only the indices.
    pub fn from_ops<I>(ops: I, indx: &[usize], n_modes: usize)
        -> OpResult<Self>
    where I: IntoIterator<Item = Op>
    {
        let ops: Vec<Op> = ops.into_iter().collect();
        check_indices(ops.len(), indx, n_modes)?;
        Ok(Self { ops, indx: indx.to_vec(), n_modes })
    }

    pub fn len(&self) -> usize { self.ops.len() }

    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    pub fn n_modes(&self) -> usize { self.n_modes }

    pub fn ops(&self) -> &[Op] { &self.ops }

    pub fn indices(&self) -> &[usize] { &self.indx }

    /// Iterate over `(operator, mode)` pairs in the order the operators act,
    /// i.e. right to left.
    pub fn iter_apply(&self) -> impl Iterator<Item = (Op, usize)> + '_ {
        self.ops.iter().copied().zip(self.indx.iter().copied()).rev()
    }

    /// Return the Hermitian conjugate of `self`.
    pub fn dagger(&self) -> Self {
        Self {
            ops: self.ops.iter().rev().map(|op| op.dagger()).collect(),
            indx: self.indx.iter().rev().copied().collect(),
            n_modes: self.n_modes,
        }
    }
}
