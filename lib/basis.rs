//! Basis cores: the per-statistics kernels that act with operator strings on
//! single basis states and map states under symmetry generators.
//!
//! All flavors share the same capability set, captured by [`BasisCore`]:
//! - [`BasisCore::op`] applies an operator string to a state, accumulating a
//!   complex amplitude;
//! - [`BasisCore::map_state`] applies one symmetry generator to one state,
//!   accumulating a sign;
//! - [`BasisCore::map_states`] does the same for a whole batch of states in
//!   parallel.
//!
//! # Example
//! ```
//! use fermion_core::{ basis::{ BasisCore, SpinfulFermionCore }, C64 };
//!
//! // two orbitals, four modes: (0↑, 1↑, 0↓, 1↓)
//! let core: SpinfulFermionCore<u32> = SpinfulFermionCore::new(2).unwrap();
//!
//! // c†_0 on the vacuum
//! let mut r: u32 = 0b0000;
//! let mut m = C64::from(1.0);
//! core.op(&mut r, &mut m, "+", &[0]).unwrap();
//! assert_eq!((r, m), (0b1000, C64::from(1.0)));
//!
//! // c†_1 c_0 hops the particle over, with no sign
//! core.op(&mut r, &mut m, "+-", &[1, 0]).unwrap();
//! assert_eq!((r, m), (0b0100, C64::from(1.0)));
//! ```

use std::marker::PhantomData;
use num_complex::Complex64 as C64;
use rayon::iter::{ IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator };
use thiserror::Error;
use crate::{
    bits::{ BitInt, fermion_map_bits, jw_sign, mode_bit, spin_map_bits },
    op::{ check_indices, Op, OpError, OpResult, OpString },
    symm::SymmetryTables,
};

/// Returned by basis core constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BasisError {
    #[error("{n_modes} modes do not fit in a {bits}-bit state")]
    TooWide { n_modes: usize, bits: u32 },

    #[error("symmetry tables are built for {got} modes, but the basis has {expected}")]
    TableWidth { expected: usize, got: usize },
}
pub type BasisResult<T> = Result<T, BasisError>;

/// Operator-string application and symmetry mapping on basis states of type
/// `I`.
pub trait BasisCore<I>: Sync
where I: BitInt
{
    /// Number of modes (bits) in a state.
    fn n_modes(&self) -> usize;

    /// Number of symmetry generators; zero disables all symmetry mapping.
    fn n_gens(&self) -> usize;

    /// Apply the operator string `opstr` acting on modes `indx` to the state
    /// `r`, multiplying `m` by the resulting matrix element.
    ///
    /// Operators act right to left. As soon as `m` vanishes, `r` is restored
    /// to its value on entry and the remaining operators are skipped; this is
    /// not an error. An unrecognized operator code aborts with
    /// [`OpError::InvalidOperator`], likewise restoring `r` while leaving `m`
    /// with whatever was accumulated before the bad code. Length and index
    /// problems are reported before anything is touched.
    fn op(&self, r: &mut I, m: &mut C64, opstr: &str, indx: &[usize])
        -> OpResult<()>;

    /// Like [`Self::op`], but for an already parsed operator string.
    ///
    /// Fails only if `ops` was validated against a larger system than `self`
    /// and addresses a mode that `self` doesn't have.
    fn op_string(&self, r: &mut I, m: &mut C64, ops: &OpString)
        -> OpResult<()>;

    /// Apply generator `gen` to `s`, multiplying `sign` by the parity picked up
    /// along the way.
    ///
    /// Returns `s` untouched (and leaves `sign` alone) if no generators are
    /// configured.
    ///
    /// *Panics if `gen` is out of bounds.*
    fn map_state(&self, s: I, gen: usize, sign: &mut i8) -> I;

    /// Apply generator `gen` to every element of `s` in place, each paired with
    /// the sign accumulator at the same position in `sign`.
    ///
    /// Elements are processed independently on the rayon thread pool. Nothing
    /// happens if no generators are configured.
    ///
    /// *Panics if `s` and `sign` differ in length or `gen` is out of bounds.*
    fn map_states(&self, s: &mut [I], gen: usize, sign: &mut [i8]) {
        assert_eq!(
            s.len(), sign.len(),
            "map_states: states and signs must have equal lengths",
        );
        if self.n_gens() == 0 { return; }
        s.par_iter_mut()
            .zip(sign.par_iter_mut())
            .for_each(|(sk, signk)| { *sk = self.map_state(*sk, gen, signk); });
    }
}

// mode count and (optional) borrowed symmetry tables, shared by every flavor
#[derive(Copy, Clone, Debug)]
struct Modes<'a, I> {
    n_modes: usize,
    tables: Option<&'a SymmetryTables>,
    int: PhantomData<fn() -> I>,
}

impl<'a, I> Modes<'a, I>
where I: BitInt
{
    fn new(n_modes: usize, tables: Option<&'a SymmetryTables>)
        -> BasisResult<Self>
    {
        if n_modes > I::BITS as usize {
            return Err(BasisError::TooWide { n_modes, bits: I::BITS });
        }
        if let Some(t) = tables {
            if t.n_modes() != n_modes {
                return Err(BasisError::TableWidth {
                    expected: n_modes,
                    got: t.n_modes(),
                });
            }
        }
        Ok(Self { n_modes, tables, int: PhantomData })
    }

    fn n_gens(&self) -> usize { self.tables.map_or(0, |t| t.n_gens()) }

    fn map(&self, gen: usize) -> Option<&'a [usize]> {
        self.tables
            .filter(|t| !t.is_empty())
            .map(|t| t.map(gen))
    }

    fn op(&self, r: &mut I, m: &mut C64, opstr: &str, indx: &[usize], fermionic: bool)
        -> OpResult<()>
    {
        let n_ops = opstr.chars().count();
        check_indices(n_ops, indx, self.n_modes)?;
        let ops
            = opstr.chars().rev()
            .zip(indx.iter().rev())
            .enumerate()
            .map(|(k, (c, &mode))| {
                Op::try_from(c)
                    .map(|op| (op, mode))
                    .map_err(|op| {
                        OpError::InvalidOperator { op, pos: n_ops - 1 - k }
                    })
            });
        act(r, m, self.n_modes, fermionic, ops)
    }

    fn op_string(&self, r: &mut I, m: &mut C64, ops: &OpString, fermionic: bool)
        -> OpResult<()>
    {
        if ops.n_modes() > self.n_modes {
            check_indices(ops.len(), ops.indices(), self.n_modes)?;
        }
        act(r, m, self.n_modes, fermionic, ops.iter_apply().map(Ok))
    }
}

// apply local operators in the order given, restoring the initial state on a
// vanishing amplitude or a bad operator
fn act<I, O>(r: &mut I, m: &mut C64, n_modes: usize, fermionic: bool, ops: O)
    -> OpResult<()>
where
    I: BitInt,
    O: IntoIterator<Item = OpResult<(Op, usize)>>,
{
    let s: I = *r;
    for item in ops.into_iter() {
        let (op, mode) = match item {
            Ok(x) => x,
            Err(err) => { *r = s; return Err(err); },
        };
        let ind = mode_bit(n_modes, mode);
        let sign: f64 = if fermionic { jw_sign(*r, ind) } else { 1.0 };
        let a: bool = r.bit(ind);
        match op {
            Op::Z => { *m *= if a { 0.5 } else { -0.5 }; },
            Op::N => { *m *= if a { 1.0 } else { 0.0 }; },
            Op::Plus => {
                *m *= if a { 0.0 } else { sign };
                *r = r.flip(ind);
            },
            Op::Minus => {
                *m *= if a { sign } else { 0.0 };
                *r = r.flip(ind);
            },
            Op::I => { },
        }
        if m.norm() == 0.0 {
            *r = s;
            break;
        }
    }
    Ok(())
}

fn spin_map_unsigned<I>(s: I, map: &[usize], n_modes: usize, _sign: &mut i8)
    -> I
where I: BitInt
{
    spin_map_bits(s, map, n_modes)
}

macro_rules! basis_core_flavor {
    (
        $( #[$meta:meta] )*
        $name:ident,
        fermionic: $fermionic:literal,
        mapper: $mapper:expr $(,)?
    ) => {
        $( #[$meta] )*
        #[derive(Copy, Clone, Debug)]
        pub struct $name<'a, I> {
            modes: Modes<'a, I>,
        }

        impl<'a, I> BasisCore<I> for $name<'a, I>
        where I: BitInt
        {
            fn n_modes(&self) -> usize { self.modes.n_modes }

            fn n_gens(&self) -> usize { self.modes.n_gens() }

            fn op(&self, r: &mut I, m: &mut C64, opstr: &str, indx: &[usize])
                -> OpResult<()>
            {
                self.modes.op(r, m, opstr, indx, $fermionic)
            }

            fn op_string(&self, r: &mut I, m: &mut C64, ops: &OpString)
                -> OpResult<()>
            {
                self.modes.op_string(r, m, ops, $fermionic)
            }

            fn map_state(&self, s: I, gen: usize, sign: &mut i8) -> I {
                match self.modes.map(gen) {
                    Some(map) => ($mapper)(s, map, self.modes.n_modes, sign),
                    None => s,
                }
            }
        }
    }
}

basis_core_flavor!(
    /// Spin-1/2 fermions on `N` orbitals, stored as `2N` modes.
    ///
    /// Mode `i < N` is orbital `i` with spin up, and mode `N + i` is orbital
    /// `i` with spin down. Creation and annihilation operators carry the
    /// Jordan–Wigner sign of the occupied modes at lower bit positions.
    SpinfulFermionCore,
    fermionic: true,
    mapper: fermion_map_bits,
);

basis_core_flavor!(
    /// Spinless fermions on `N` modes.
    SpinlessFermionCore,
    fermionic: true,
    mapper: fermion_map_bits,
);

basis_core_flavor!(
    /// Hard-core bosons (equivalently, spin-1/2 degrees of freedom with `z`
    /// measuring *S*<sup>*z*</sup>) on `N` sites.
    ///
    /// Uses the same operator codes as the fermionic flavors, without any sign
    /// bookkeeping.
    SpinCore,
    fermionic: false,
    mapper: spin_map_unsigned,
);

impl<'a, I> SpinfulFermionCore<'a, I>
where I: BitInt
{
    /// Create a new core for `n` orbitals with no symmetries.
    pub fn new(n: usize) -> BasisResult<Self> {
        Ok(Self { modes: Modes::new(2 * n, None)? })
    }

    /// Create a new core for `n` orbitals whose symmetry generators act on all
    /// `2n` modes.
    pub fn with_symmetry(n: usize, tables: &'a SymmetryTables)
        -> BasisResult<Self>
    {
        Ok(Self { modes: Modes::new(2 * n, Some(tables))? })
    }

    /// Number of orbitals.
    pub fn n_orbitals(&self) -> usize { self.modes.n_modes / 2 }
}

impl<'a, I> SpinlessFermionCore<'a, I>
where I: BitInt
{
    /// Create a new core for `n` modes with no symmetries.
    pub fn new(n: usize) -> BasisResult<Self> {
        Ok(Self { modes: Modes::new(n, None)? })
    }

    /// Create a new core for `n` modes with symmetries.
    pub fn with_symmetry(n: usize, tables: &'a SymmetryTables)
        -> BasisResult<Self>
    {
        Ok(Self { modes: Modes::new(n, Some(tables))? })
    }
}

impl<'a, I> SpinCore<'a, I>
where I: BitInt
{
    /// Create a new core for `n` sites with no symmetries.
    pub fn new(n: usize) -> BasisResult<Self> {
        Ok(Self { modes: Modes::new(n, None)? })
    }

    /// Create a new core for `n` sites with symmetries.
    pub fn with_symmetry(n: usize, tables: &'a SymmetryTables)
        -> BasisResult<Self>
    {
        Ok(Self { modes: Modes::new(n, Some(tables))? })
    }
}
