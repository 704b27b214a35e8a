//! Fixed-width bitstring encoding of occupation-number basis states.
//!
//! A basis state over `n` modes is an unsigned integer whose bit `p` holds the
//! occupation (0 or 1) of internal position `p`. Externally, modes are numbered
//! the other way around: mode `i` lives at bit `n - i - 1`, so that reading the
//! integer in binary from the most significant used bit gives the occupations
//! of modes `0, 1, ..., n - 1` in order.
//!
//! Fermionic states are taken to be built as
//! c<sup>†</sup><sub>*p*<sub>1</sub></sub> c<sup>†</sup><sub>*p*<sub>2</sub></sub>
//! ··· ∣vac⟩ with *p*<sub>1</sub> < *p*<sub>2</sub> < ··· the occupied bit
//! positions, which fixes every sign below.

use std::ops::{ BitAnd, BitOr, BitXor, Not, Shl, Shr };

/// An unsigned integer usable as a basis state.
pub trait BitInt:
    Copy
    + Clone
    + std::fmt::Debug
    + std::fmt::Binary
    + PartialEq
    + Eq
    + std::hash::Hash
    + Send
    + Sync
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Number of bits in the representation.
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;

    /// Return the occupation at bit position `p`.
    fn bit(self, p: u32) -> bool;

    /// Toggle the occupation at bit position `p`.
    fn flip(self, p: u32) -> Self;

    /// Set the occupation at bit position `p`.
    fn set(self, p: u32) -> Self;

    /// Count the occupied positions strictly below `p`.
    fn count_below(self, p: u32) -> u32;

    fn count_ones(self) -> u32;

    fn to_u128(self) -> u128;

    /// Truncating conversion from `u128`.
    fn from_u128(u: u128) -> Self;
}

macro_rules! impl_bitint {
    ( $t:ty ) => {
        impl BitInt for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn bit(self, p: u32) -> bool { (self >> p) & 1 == 1 }

            #[inline]
            fn flip(self, p: u32) -> Self { self ^ (1 << p) }

            #[inline]
            fn set(self, p: u32) -> Self { self | (1 << p) }

            #[inline]
            fn count_below(self, p: u32) -> u32 {
                // shifting out everything at or above p; p == 0 overflows the
                // shift, which is exactly the empty count
                self.checked_shl(<$t>::BITS - p)
                    .map_or(0, |u| u.count_ones())
            }

            #[inline]
            fn count_ones(self) -> u32 { <$t>::count_ones(self) }

            #[inline]
            fn to_u128(self) -> u128 { self as u128 }

            #[inline]
            fn from_u128(u: u128) -> Self { u as $t }
        }
    }
}
impl_bitint!(u8);
impl_bitint!(u16);
impl_bitint!(u32);
impl_bitint!(u64);
impl_bitint!(u128);

/// Convert an external mode index to its internal bit position for a register
/// of `n_modes` modes.
#[inline]
pub fn mode_bit(n_modes: usize, mode: usize) -> u32 {
    (n_modes - mode - 1) as u32
}

/// Jordan–Wigner parity for an operator acting at bit position `p` of `s`:
/// `-1.0` if an odd number of positions below `p` are occupied, `+1.0`
/// otherwise.
#[inline]
pub fn jw_sign<I>(s: I, p: u32) -> f64
where I: BitInt
{
    if s.count_below(p) & 1 == 1 { -1.0 } else { 1.0 }
}

/// Permute the modes of `s` according to `map` (mode `i` is sent to mode
/// `map[i]`) and multiply `sign` by the parity of reordering the resulting
/// creation operators back into canonical order.
///
/// `map` must be a permutation of `0..n_modes`; this is not checked here.
pub fn fermion_map_bits<I>(s: I, map: &[usize], n_modes: usize, sign: &mut i8)
    -> I
where I: BitInt
{
    let mut ss = I::ZERO;
    let mut rem = s;
    // target bit positions, visited in ascending source-bit order; a u128
    // state has at most 128 occupied modes
    let mut targets = [0_u8; 128];
    let mut np: usize = 0;
    for i in (0..n_modes).rev() {
        if rem.bit(0) {
            let t = mode_bit(n_modes, map[i]);
            ss = ss.set(t);
            targets[np] = t as u8;
            np += 1;
        }
        rem = rem >> 1;
    }
    if inversion_parity(&targets[..np]) { *sign = -*sign; }
    ss
}

/// Like [`fermion_map_bits`], but without tracking a sign.
pub fn spin_map_bits<I>(s: I, map: &[usize], n_modes: usize) -> I
where I: BitInt
{
    let mut ss = I::ZERO;
    let mut rem = s;
    for i in (0..n_modes).rev() {
        if rem.bit(0) { ss = ss.set(mode_bit(n_modes, map[i])); }
        rem = rem >> 1;
    }
    ss
}

// true if the number of pairs (a < b) with pos[a] > pos[b] is odd; entries are
// distinct bit positions < 128, so a running mask of what has been seen gives
// the count in O(n)
fn inversion_parity(pos: &[u8]) -> bool {
    let mut seen: u128 = 0;
    let mut odd = false;
    for &p in pos.iter() {
        // earlier entries greater than p
        let above = (seen >> p >> 1).count_ones();
        odd ^= above & 1 == 1;
        seen |= 1_u128 << p;
    }
    odd
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn count_below_edges() {
        let s: u8 = 0b1011_0110;
        assert_eq!(s.count_below(0), 0);
        assert_eq!(s.count_below(1), 0);
        assert_eq!(s.count_below(2), 1);
        assert_eq!(s.count_below(3), 2);
        assert_eq!(s.count_below(7), 4);
        assert_eq!(u128::MAX.count_below(127), 127);
        assert_eq!(u64::MAX.count_below(0), 0);
    }

    #[test]
    fn bit_ops() {
        let s: u32 = 0b0100;
        assert!(s.bit(2));
        assert!(!s.bit(1));
        assert_eq!(s.flip(2), 0);
        assert_eq!(s.flip(0), 0b0101);
        assert_eq!(s.set(2), s);
        assert_eq!(u32::from_u128(s.to_u128()), s);
    }

    #[test]
    fn mode_bit_reverses() {
        assert_eq!(mode_bit(4, 0), 3);
        assert_eq!(mode_bit(4, 3), 0);
    }

    #[test]
    fn jw_sign_counts_lower() {
        assert_eq!(jw_sign(0b0000_u8, 3), 1.0);
        assert_eq!(jw_sign(0b0001_u8, 3), -1.0);
        assert_eq!(jw_sign(0b0011_u8, 3), 1.0);
        assert_eq!(jw_sign(0b1000_u8, 3), 1.0);
    }

    #[test]
    fn inversions() {
        assert!(!inversion_parity(&[]));
        assert!(!inversion_parity(&[0, 1, 2]));
        assert!(inversion_parity(&[1, 0]));
        assert!(!inversion_parity(&[1, 2]));
        assert!(inversion_parity(&[2, 1, 0]));
        assert!(!inversion_parity(&[3, 2, 1, 0]));
        assert!(!inversion_parity(&[127, 0, 64]));
    }

    #[test]
    fn identity_map() {
        let map = [0, 1, 2, 3];
        for s in 0..16_u8 {
            let mut sign: i8 = 1;
            assert_eq!(fermion_map_bits(s, &map, 4, &mut sign), s);
            assert_eq!(sign, 1);
            assert_eq!(spin_map_bits(s, &map, 4), s);
        }
    }

    #[test]
    fn swap_two_fermions() {
        // modes 0 <-> 1 on a two-mode register
        let map = [1, 0];
        let mut sign: i8 = 1;
        assert_eq!(fermion_map_bits(0b11_u8, &map, 2, &mut sign), 0b11);
        assert_eq!(sign, -1);

        let mut sign: i8 = 1;
        assert_eq!(fermion_map_bits(0b10_u8, &map, 2, &mut sign), 0b01);
        assert_eq!(sign, 1);
    }

    #[test]
    fn translation_sign() {
        // cyclic shift i -> i + 1 on three modes, all occupied: a 3-cycle is
        // an even permutation
        let map = [1, 2, 0];
        let mut sign: i8 = 1;
        assert_eq!(fermion_map_bits(0b111_u16, &map, 3, &mut sign), 0b111);
        assert_eq!(sign, 1);

        // modes 0 and 2 occupied (bits 2 and 0) -> modes 1 and 0: order flips
        let mut sign: i8 = -1;
        assert_eq!(fermion_map_bits(0b101_u16, &map, 3, &mut sign), 0b110);
        assert_eq!(sign, 1);
    }

    #[test]
    fn map_preserves_particle_number() {
        let map = [3, 0, 2, 1];
        for s in 0..16_u64 {
            let mut sign: i8 = 1;
            let ss = fermion_map_bits(s, &map, 4, &mut sign);
            assert_eq!(ss.count_ones(), s.count_ones());
            assert_eq!(spin_map_bits(s, &map, 4), ss);
        }
    }
}
