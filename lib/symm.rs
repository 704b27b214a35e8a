//! Symmetry generator tables.
//!
//! Each generator of the symmetry group is stored as a permutation of the
//! external mode indices together with its period (the smallest positive power
//! at which the caller considers it to act as the identity) and the quantum
//! number selecting the symmetry sector. The tables are built once by whatever
//! constructs the reduced basis and are only ever read afterwards, so basis
//! cores hold them by shared reference.

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

/// Returned by [`SymmetryTables::new`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymmError {
    #[error("map table of length {len} is not a multiple of {n_modes} modes")]
    MapLength { len: usize, n_modes: usize },

    #[error("generator {gen} is not a permutation of 0..{n_modes}")]
    NotPermutation { gen: usize, n_modes: usize },

    #[error("got {maps} maps, {pers} periods, and {qs} quantum numbers")]
    CountMismatch { maps: usize, pers: usize, qs: usize },

    #[error("generator {gen} does not return to the identity after {per} applications")]
    BadPeriod { gen: usize, per: i32 },
}
pub type SymmResult<T> = Result<T, SymmError>;

/// Read-only storage for a set of symmetry generators over a fixed number of
/// modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetryTables {
    n_modes: usize,
    // generator g occupies maps[g * n_modes .. (g + 1) * n_modes]
    maps: Vec<usize>,
    pers: Vec<i32>,
    qs: Vec<i32>,
}

impl SymmetryTables {
    /// Validate and store a set of generators.
    ///
    /// `maps` is the concatenation of one permutation of `0..n_modes` per
    /// generator; `pers` and `qs` hold one entry per generator.
    pub fn new(n_modes: usize, maps: Vec<usize>, pers: Vec<i32>, qs: Vec<i32>)
        -> SymmResult<Self>
    {
        if n_modes == 0 || maps.len() % n_modes != 0 {
            return Err(SymmError::MapLength { len: maps.len(), n_modes });
        }
        let n_gens = maps.len() / n_modes;
        if pers.len() != n_gens || qs.len() != n_gens {
            return Err(SymmError::CountMismatch {
                maps: n_gens,
                pers: pers.len(),
                qs: qs.len(),
            });
        }
        for (gen, map) in maps.chunks_exact(n_modes).enumerate() {
            if !map.iter().all(|&j| j < n_modes) || !map.iter().all_unique() {
                return Err(SymmError::NotPermutation { gen, n_modes });
            }
            let per = pers[gen];
            if per <= 0 || !is_identity_after(map, per as usize) {
                return Err(SymmError::BadPeriod { gen, per });
            }
        }
        debug!(
            n_modes,
            n_gens,
            pers = ?pers,
            qs = ?qs,
            "constructed symmetry tables"
        );
        Ok(Self { n_modes, maps, pers, qs })
    }

    /// Tables with no generators; basis cores built on these never transform
    /// states.
    pub fn empty(n_modes: usize) -> Self {
        Self { n_modes, maps: Vec::new(), pers: Vec::new(), qs: Vec::new() }
    }

    pub fn n_modes(&self) -> usize { self.n_modes }

    /// Number of generators.
    pub fn n_gens(&self) -> usize { self.pers.len() }

    pub fn is_empty(&self) -> bool { self.pers.is_empty() }

    /// Return the permutation for generator `gen`.
    ///
    /// *Panics if `gen` is out of bounds.*
    pub fn map(&self, gen: usize) -> &[usize] {
        &self.maps[gen * self.n_modes..(gen + 1) * self.n_modes]
    }

    /// Period of generator `gen`.
    pub fn per(&self, gen: usize) -> i32 { self.pers[gen] }

    /// Quantum number of generator `gen`.
    pub fn q(&self, gen: usize) -> i32 { self.qs[gen] }

    pub fn iter_maps(&self) -> std::slice::ChunksExact<'_, usize> {
        self.maps.chunks_exact(self.n_modes)
    }
}

// apply `map` to the identity permutation `per` times
fn is_identity_after(map: &[usize], per: usize) -> bool {
    let mut cur: Vec<usize> = (0..map.len()).collect();
    for _ in 0..per {
        cur.iter_mut().for_each(|c| { *c = map[*c]; });
    }
    cur.iter().enumerate().all(|(i, &c)| i == c)
}

#[cfg(test)]
mod test {
    use super::*;

    fn translation(n: usize) -> Vec<usize> { (0..n).map(|i| (i + 1) % n).collect() }

    fn reflection(n: usize) -> Vec<usize> { (0..n).rev().collect() }

    #[test]
    fn build_two_generators() {
        let maps: Vec<usize>
            = translation(4).into_iter().chain(reflection(4)).collect();
        let tables = SymmetryTables::new(4, maps, vec![4, 2], vec![1, 0])
            .unwrap();
        assert_eq!(tables.n_gens(), 2);
        assert_eq!(tables.map(0), &[1, 2, 3, 0]);
        assert_eq!(tables.map(1), &[3, 2, 1, 0]);
        assert_eq!(tables.per(0), 4);
        assert_eq!(tables.q(0), 1);
        assert_eq!(tables.iter_maps().count(), 2);
    }

    #[test]
    fn period_may_be_a_multiple_of_the_order() {
        assert!(SymmetryTables::new(4, reflection(4), vec![4], vec![0]).is_ok());
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            SymmetryTables::new(4, vec![0, 1, 2], vec![1], vec![0]),
            Err(SymmError::MapLength { len: 3, n_modes: 4 }),
        );
        assert_eq!(
            SymmetryTables::new(3, vec![0, 0, 1], vec![1], vec![0]),
            Err(SymmError::NotPermutation { gen: 0, n_modes: 3 }),
        );
        assert_eq!(
            SymmetryTables::new(3, vec![0, 1, 3], vec![1], vec![0]),
            Err(SymmError::NotPermutation { gen: 0, n_modes: 3 }),
        );
        assert_eq!(
            SymmetryTables::new(3, translation(3), vec![1, 1], vec![0]),
            Err(SymmError::CountMismatch { maps: 1, pers: 2, qs: 1 }),
        );
        assert_eq!(
            SymmetryTables::new(3, translation(3), vec![2], vec![0]),
            Err(SymmError::BadPeriod { gen: 0, per: 2 }),
        );
        assert_eq!(
            SymmetryTables::new(3, translation(3), vec![0], vec![0]),
            Err(SymmError::BadPeriod { gen: 0, per: 0 }),
        );
    }

    #[test]
    fn empty_tables() {
        let tables = SymmetryTables::empty(6);
        assert!(tables.is_empty());
        assert_eq!(tables.n_gens(), 0);
        assert_eq!(tables.n_modes(), 6);
        assert!(SymmetryTables::new(6, Vec::new(), Vec::new(), Vec::new())
            .unwrap()
            .is_empty());
    }
}
