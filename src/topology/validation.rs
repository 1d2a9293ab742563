//! Structural invariants of the level hierarchy.
//!
//! Checks run on demand through [`DebugInvariants::validate_invariants`] and,
//! in debug builds or with the `strict-invariants` / `check-invariants`
//! features, after every coarsening level via [`debug_invariants!`].

use crate::geometry::positions::PositionProvider;
use crate::mesh_error::MeshError;
use crate::topology::mask::LevelMask;
use crate::topology::multiscale::Multiscale;
use crate::topology::neighbors::NeighborGraph;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Run a fallible check and panic on error when invariant checking is
/// enabled; expands to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

fn violation(level: usize, detail: String) -> Result<(), MeshError> {
    Err(MeshError::InvariantViolation { level, detail })
}

/// Symmetric, loop-free, and only connecting points present in `mask`.
pub fn check_level_graph(
    level: usize,
    graph: &NeighborGraph,
    mask: &LevelMask,
) -> Result<(), MeshError> {
    if graph.len() != mask.len() {
        return violation(
            level,
            format!("graph covers {} points, mask {}", graph.len(), mask.len()),
        );
    }
    for p in 0..graph.len() {
        let nbrs = graph.neighbors_of(p);
        if !mask.contains(p) && !nbrs.is_empty() {
            return violation(level, format!("absent point {p} keeps {} neighbors", nbrs.len()));
        }
        for &q in nbrs {
            if q == p {
                return violation(level, format!("self-loop at {p}"));
            }
            if !mask.contains(q) {
                return violation(level, format!("edge {p}-{q} reaches absent point"));
            }
            if !graph.contains_edge(q, p) {
                return violation(level, format!("edge {p}-{q} has no mirror"));
            }
        }
    }
    Ok(())
}

/// Every point present in `coarse` must be present in `fine`.
pub fn check_nested(level: usize, fine: &LevelMask, coarse: &LevelMask) -> Result<(), MeshError> {
    match coarse.active_points().find(|&p| !fine.contains(p)) {
        Some(p) => violation(level, format!("point {p} reappears after removal")),
        None => Ok(()),
    }
}

/// Boundary points persist at every level.
pub fn check_boundary<P: PositionProvider>(
    level: usize,
    positions: &P,
    mask: &LevelMask,
) -> Result<(), MeshError> {
    match (0..mask.len()).find(|&p| positions.is_boundary(p) && !mask.contains(p)) {
        Some(p) => violation(level, format!("boundary point {p} was removed")),
        None => Ok(()),
    }
}

/// Points removed by the deepest level and deleted-map entries agree.
fn check_deleted(store: &Multiscale) -> Result<(), MeshError> {
    let deepest = store.max_level();
    let mask = store.level_mask(deepest)?;
    let deleted = store.deleted();
    for p in (0..mask.len()).filter(|&p| !mask.contains(p)) {
        if deleted.seed_of(p).is_none() {
            return violation(deepest, format!("removed point {p} has no seed"));
        }
    }
    for (removed, seed) in deleted.entries() {
        if removed == seed || seed >= mask.len() {
            return violation(deepest, format!("invalid seed {seed} for point {removed}"));
        }
        if mask.contains(removed) {
            return violation(deepest, format!("point {removed} has a seed but is present"));
        }
    }
    Ok(())
}

impl DebugInvariants for Multiscale {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "multiscale store");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        for level in 0..=self.max_level() {
            let mask = self.level_mask(level)?;
            check_level_graph(level, self.graph(level)?, mask)?;
            if level > 0 {
                check_nested(level, self.level_mask(level - 1)?, mask)?;
            }
        }
        check_deleted(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::positions::PointCloud;

    fn chain(n: usize) -> Multiscale {
        Multiscale::new(NeighborGraph::from_edges(n, (1..n).map(|i| (i - 1, i))).unwrap())
            .unwrap()
    }

    #[test]
    fn fresh_store_is_valid() {
        let ms = chain(4);
        assert!(ms.validate_invariants().is_ok());
        ms.debug_assert_invariants();
    }

    #[test]
    fn dangling_edge_is_reported() {
        let mut ms = chain(3);
        ms.push_level();
        ms.deepest_level_mut().mask.remove(1).unwrap();
        let err = ms.validate_invariants().unwrap_err();
        assert!(matches!(err, MeshError::InvariantViolation { level: 1, .. }));
    }

    #[test]
    fn removal_without_seed_is_reported() {
        let mut ms = chain(3);
        ms.push_level();
        {
            let level = ms.deepest_level_mut();
            level.graph.isolate(1).unwrap();
            level.mask.remove(1).unwrap();
        }
        assert!(ms.validate_invariants().is_err());
        ms.deepest_level_mut().deleted.insert(1, 0);
        assert!(ms.validate_invariants().is_ok());
    }

    #[test]
    fn boundary_removal_is_reported() {
        let cloud = PointCloud::try_new(
            vec![[0.0; 3], [1.0, 0.0, 0.0]],
            vec![true, false],
        )
        .unwrap();
        let mut mask = LevelMask::full(2);
        assert!(check_boundary(0, &cloud, &mask).is_ok());
        mask.remove(0).unwrap();
        assert!(check_boundary(1, &cloud, &mask).is_err());
    }

    #[test]
    #[should_panic]
    #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
    fn broken_store_panics_when_checking_is_enabled() {
        let mut ms = chain(3);
        ms.push_level();
        ms.deepest_level_mut().mask.remove(2).unwrap();
        ms.debug_assert_invariants();
    }
}
