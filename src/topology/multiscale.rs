//! Level-indexed store of masks and neighbor graphs.
//!
//! Level 0 holds the full point set. Each new level starts as a deep copy of
//! the previous one and only the deepest level accepts mutations; earlier
//! levels stay queryable and unchanged.

use std::collections::BTreeSet;

use crate::mesh_error::MeshError;
use crate::topology::deleted::DeletedPointMap;
use crate::topology::mask::LevelMask;
use crate::topology::neighbors::NeighborGraph;

/// Masks and graphs for every level built so far.
#[derive(Clone, Debug)]
pub struct Multiscale {
    masks: Vec<LevelMask>,
    graphs: Vec<NeighborGraph>,
    deleted: DeletedPointMap,
}

/// Mutable view of the deepest level, handed to the coarsening engine.
#[derive(Debug)]
pub struct LevelMut<'a> {
    pub level: usize,
    pub graph: &'a mut NeighborGraph,
    pub mask: &'a mut LevelMask,
    pub deleted: &'a mut DeletedPointMap,
}

impl Multiscale {
    /// Start a hierarchy whose level 0 is `base` with every point present.
    pub fn new(base: NeighborGraph) -> Result<Self, MeshError> {
        if base.is_empty() {
            return Err(MeshError::EmptyPointCloud);
        }
        Ok(Self {
            masks: vec![LevelMask::full(base.len())],
            graphs: vec![base],
            deleted: DeletedPointMap::new(),
        })
    }

    /// Number of points at full resolution.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.masks[0].len()
    }

    /// Index of the deepest (coarsest) level built so far.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.masks.len() - 1
    }

    fn check_level(&self, level: usize) -> Result<(), MeshError> {
        if level <= self.max_level() {
            Ok(())
        } else {
            Err(MeshError::LevelOutOfRange {
                level,
                max_level: self.max_level(),
            })
        }
    }

    fn check_point(&self, p: usize) -> Result<(), MeshError> {
        if p < self.num_points() {
            Ok(())
        } else {
            Err(MeshError::PointOutOfRange {
                point: p,
                len: self.num_points(),
            })
        }
    }

    fn check_mutable(&self, level: usize) -> Result<(), MeshError> {
        self.check_level(level)?;
        if level == self.max_level() {
            Ok(())
        } else {
            Err(MeshError::FrozenLevel {
                level,
                max_level: self.max_level(),
            })
        }
    }

    /// Append a new level as a deep copy of the deepest one; returns its index.
    pub fn push_level(&mut self) -> usize {
        let mask = self.masks[self.max_level()].clone();
        let graph = self.graphs[self.max_level()].clone();
        self.masks.push(mask);
        self.graphs.push(graph);
        self.max_level()
    }

    /// Presence of `p` at `level`.
    pub fn mask(&self, level: usize, p: usize) -> Result<bool, MeshError> {
        self.check_level(level)?;
        self.masks[level].try_contains(p)
    }

    /// Neighbors of `p` at `level`.
    pub fn neighbors(&self, p: usize, level: usize) -> Result<&BTreeSet<usize>, MeshError> {
        self.check_level(level)?;
        self.graphs[level].neighbors(p)
    }

    /// Presence flags of `level`.
    pub fn level_mask(&self, level: usize) -> Result<&LevelMask, MeshError> {
        self.check_level(level)?;
        Ok(&self.masks[level])
    }

    /// Neighbor graph of `level`.
    pub fn graph(&self, level: usize) -> Result<&NeighborGraph, MeshError> {
        self.check_level(level)?;
        Ok(&self.graphs[level])
    }

    /// Symmetric edge insertion on the deepest level.
    pub fn add_edge(&mut self, level: usize, a: usize, b: usize) -> Result<bool, MeshError> {
        self.check_mutable(level)?;
        self.graphs[level].add_edge(a, b)
    }

    /// Symmetric edge removal on the deepest level.
    pub fn remove_edge(&mut self, level: usize, a: usize, b: usize) -> Result<bool, MeshError> {
        self.check_mutable(level)?;
        self.graphs[level].remove_edge(a, b)
    }

    /// Mutable view of the deepest level.
    pub fn deepest_level_mut(&mut self) -> LevelMut<'_> {
        let level = self.max_level();
        LevelMut {
            level,
            graph: &mut self.graphs[level],
            mask: &mut self.masks[level],
            deleted: &mut self.deleted,
        }
    }

    /// Removed point → seed bookkeeping across all levels.
    #[inline]
    pub fn deleted(&self) -> &DeletedPointMap {
        &self.deleted
    }

    /// Number of points present at `level`.
    pub fn total_points_at_level(&self, level: usize) -> Result<usize, MeshError> {
        Ok(self.level_mask(level)?.count())
    }

    /// Present ids at `level`, ascending.
    pub fn active_points(&self, level: usize) -> Result<Vec<usize>, MeshError> {
        Ok(self.level_mask(level)?.active_points().collect())
    }

    /// Points present at `fine` but absent at `coarse`, ascending.
    pub fn difference_points(&self, coarse: usize, fine: usize) -> Result<Vec<usize>, MeshError> {
        let coarse_mask = self.level_mask(coarse)?;
        let fine_mask = self.level_mask(fine)?;
        Ok(fine_mask
            .active_points()
            .filter(|&p| !coarse_mask.contains(p))
            .collect())
    }

    /// Bounds-checked seed lookup for a removed point.
    pub fn seed_of(&self, p: usize) -> Result<Option<usize>, MeshError> {
        self.check_point(p)?;
        Ok(self.deleted.seed_of(p))
    }
}
