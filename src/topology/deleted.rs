//! Removed point → absorbing seed.
//!
//! Entries are written exactly once, when coarsening masks a non-boundary
//! point out. A seed may itself be removed at a deeper level, so lookups for
//! a point present at some level follow the chain of seeds.

use hashbrown::HashMap;

/// Map from each coarsened-away point to the seed that removed it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeletedPointMap {
    seeds: HashMap<usize, usize>,
}

impl DeletedPointMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `seed` absorbed `removed`. Returns the previous seed if
    /// `removed` had already been recorded.
    pub fn insert(&mut self, removed: usize, seed: usize) -> Option<usize> {
        self.seeds.insert(removed, seed)
    }

    /// Direct seed of `removed`, if it was ever coarsened away.
    pub fn seed_of(&self, removed: usize) -> Option<usize> {
        self.seeds.get(&removed).copied()
    }

    /// Follow the seed chain from `point` until `present` accepts a point.
    ///
    /// Returns `None` when the chain ends (or loops) without reaching an
    /// accepted point.
    pub fn resolve(&self, point: usize, present: impl Fn(usize) -> bool) -> Option<usize> {
        let mut current = self.seed_of(point)?;
        for _ in 0..=self.seeds.len() {
            if present(current) {
                return Some(current);
            }
            current = self.seed_of(current)?;
        }
        None
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// `(removed, seed)` pairs sorted by removed id.
    pub fn entries(&self) -> Vec<(usize, usize)> {
        let mut out: Vec<_> = self.seeds.iter().map(|(&r, &s)| (r, s)).collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_follows_the_chain() {
        let mut map = DeletedPointMap::new();
        map.insert(1, 2);
        map.insert(2, 5);
        assert_eq!(map.seed_of(1), Some(2));
        assert_eq!(map.resolve(1, |p| p == 5), Some(5));
        assert_eq!(map.resolve(1, |p| p == 2), Some(2));
        assert_eq!(map.resolve(1, |_| false), None);
        assert_eq!(map.resolve(9, |_| true), None);
    }

    #[test]
    fn cyclic_chains_terminate() {
        let mut map = DeletedPointMap::new();
        map.insert(1, 2);
        map.insert(2, 1);
        assert_eq!(map.resolve(1, |_| false), None);
    }
}
