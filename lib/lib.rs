//! Occupation-number basis states of fermionic (and hard-core bosonic) modes
//! encoded as fixed-width bitstrings, with the two kernels needed to build
//! symmetry-reduced operator matrices on top of them:
//! - the action of a string of local operators (identity, number,
//!   polarization, raising, lowering) on a single basis state, with
//!   Jordan–Wigner sign bookkeeping;
//! - the action of a symmetry generator (a permutation of modes) on one state
//!   or a batch of states, with the sign picked up by reordering fermions.
//!
//! Enumerating the reduced basis and assembling matrices are left to the
//! caller.

pub mod bits;
pub mod op;
pub mod symm;
pub mod basis;

pub use num_complex::Complex64 as C64;
pub use crate::{
    bits::BitInt,
    basis::{ BasisCore, BasisError, SpinCore, SpinfulFermionCore, SpinlessFermionCore },
    op::{ Op, OpError, OpString },
    symm::{ SymmError, SymmetryTables },
};
