//! Local coarsening: seed selection and neighborhood re-triangulation.
//!
//! A coarsening pass visits the present points of the deepest level in
//! ascending id order. An eligible seed removes its non-boundary neighbors
//! from the level, then the neighborhood around the resulting hole is
//! re-triangulated with the local-adjacency primitive and merged back into
//! the level's graph.
//!
//! Passes are strictly sequential: whether a point is eligible depends on the
//! seeds picked earlier in the same pass and on the graph edits they made.

use std::collections::BTreeSet;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::geometry::adjacency::{LocalAdjacency, LocalPoint};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::positions::PositionProvider;
use crate::mesh_error::MeshError;
use crate::topology::mask::LevelMask;
use crate::topology::multiscale::{LevelMut, Multiscale};
use crate::topology::neighbors::NeighborGraph;

/// Tunable seed-selection policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarseningOptions {
    /// Refuse a seed when one of its neighbors is already a seed in the
    /// current pass. Prevents adjacent coarsenings from carving large holes.
    pub forbid_adjacent_seeds: bool,
}

impl Default for CoarseningOptions {
    fn default() -> Self {
        Self {
            forbid_adjacent_seeds: true,
        }
    }
}

/// Relative difference `|a - b| / (a + b)`; zero when both values vanish.
#[inline]
pub fn similarity(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        0.0
    } else {
        (a - b).abs() / sum
    }
}

/// Outcome of one local remeshing around a seed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemeshReport {
    /// The seed point.
    pub seed: usize,
    /// Neighbors masked out at this level, ascending.
    pub removed: Vec<usize>,
    /// Size of the working set handed to the adjacency primitive.
    pub working_set: usize,
    /// Edges inserted while merging the local adjacency.
    pub edges_added: usize,
}

/// Outcome of a full pass over one level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelReport {
    pub level: usize,
    pub tolerance: f64,
    /// Seeds in the order they were chosen.
    pub seeds: Vec<usize>,
    /// Points masked out by this pass.
    pub removed: usize,
    /// Points still present after the pass.
    pub remaining: usize,
}

/// Seed selection and graph surgery over a frozen point cloud.
pub struct CoarseningEngine<'a, P, A> {
    positions: &'a P,
    reference: &'a [f64],
    adjacency: &'a A,
    options: CoarseningOptions,
}

impl<'a, P, A> CoarseningEngine<'a, P, A>
where
    P: PositionProvider,
    A: LocalAdjacency,
{
    /// `reference` is the scalar field compared by the similarity criterion,
    /// one value per point.
    pub fn new(
        positions: &'a P,
        reference: &'a [f64],
        adjacency: &'a A,
        options: CoarseningOptions,
    ) -> Result<Self, MeshError> {
        if reference.len() != positions.len() {
            return Err(MeshError::LengthMismatch {
                what: "reference field",
                expected: positions.len(),
                found: reference.len(),
            });
        }
        Ok(Self {
            positions,
            reference,
            adjacency,
            options,
        })
    }

    #[inline]
    pub fn options(&self) -> CoarseningOptions {
        self.options
    }

    /// Whether `p` may seed a coarsening at this level under `tolerance`.
    pub fn is_eligible(
        &self,
        graph: &NeighborGraph,
        mask: &LevelMask,
        p: usize,
        tolerance: f64,
        seeds: &HashSet<usize>,
    ) -> bool {
        if !mask.contains(p) || self.positions.is_boundary(p) {
            return false;
        }
        let rho = self.reference[p];
        graph.neighbors_of(p).iter().all(|&n| {
            !(self.options.forbid_adjacent_seeds && seeds.contains(&n))
                && similarity(rho, self.reference[n]) < tolerance
        })
    }

    /// Remove the non-boundary neighbors of `seed` and re-triangulate the hole.
    pub fn coarsen_around(
        &self,
        level: &mut LevelMut<'_>,
        seed: usize,
    ) -> Result<RemeshReport, MeshError> {
        let graph = &mut *level.graph;
        let first_ring: Vec<usize> = graph.neighbors(seed)?.iter().copied().collect();

        let mut removed = Vec::new();
        let mut second_ring = BTreeSet::new();
        for &n in &first_ring {
            if self.positions.is_boundary(n) {
                second_ring.insert(n);
            } else {
                level.mask.remove(n)?;
                level.deleted.insert(n, seed);
                removed.push(n);
            }
        }

        for &r in &removed {
            for q in graph.isolate(r)? {
                if q != seed && level.mask.contains(q) {
                    second_ring.insert(q);
                }
            }
        }

        let mut working: BTreeSet<usize> = second_ring.clone();
        for &q in &second_ring {
            working.extend(
                graph
                    .neighbors_of(q)
                    .iter()
                    .copied()
                    .filter(|&s| s != seed && level.mask.contains(s)),
            );
        }
        working.insert(seed);

        graph.isolate(seed)?;

        let points: Vec<LocalPoint> = working
            .iter()
            .map(|&id| LocalPoint {
                id,
                position: self.positions.position(id),
            })
            .collect();
        let bounds = BoundingBox::around(points.iter().map(|p| p.position))
            .ok_or(MeshError::EmptyPointCloud)?
            .inflated();
        let reported = self.adjacency.compute_neighbors(&points, &bounds);

        let mut edges_added = 0;
        for (point, list) in points.iter().zip(reported) {
            if point.id != seed && !second_ring.contains(&point.id) {
                continue;
            }
            for q in list.into_iter().filter_map(|n| n.point()) {
                if q == point.id || !working.contains(&q) {
                    continue;
                }
                if graph.add_edge(point.id, q)? {
                    edges_added += 1;
                }
            }
        }

        log::trace!(
            "level {}: seed {seed} removed {} points, working set {}, {edges_added} new edges",
            level.level,
            removed.len(),
            points.len()
        );

        Ok(RemeshReport {
            seed,
            removed,
            working_set: points.len(),
            edges_added,
        })
    }

    /// Append a level to `store` and run one coarsening pass over it.
    pub fn coarsen_level(
        &self,
        store: &mut Multiscale,
        tolerance: f64,
    ) -> Result<LevelReport, MeshError> {
        if store.num_points() != self.positions.len() {
            return Err(MeshError::LengthMismatch {
                what: "multiscale store",
                expected: self.positions.len(),
                found: store.num_points(),
            });
        }
        store.push_level();
        let mut level = store.deepest_level_mut();
        let before = level.mask.count();
        let mut chosen = HashSet::new();
        let mut seeds = Vec::new();

        for p in 0..self.positions.len() {
            if !self.is_eligible(&*level.graph, &*level.mask, p, tolerance, &chosen) {
                continue;
            }
            self.coarsen_around(&mut level, p)?;
            chosen.insert(p);
            seeds.push(p);
        }

        let remaining = level.mask.count();
        Ok(LevelReport {
            level: level.level,
            tolerance,
            seeds,
            removed: before - remaining,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::adjacency::{BoxWall, GabrielAdjacency, LocalNeighbor};
    use crate::geometry::positions::PointCloud;

    fn line(n: usize, boundary_ends: bool) -> PointCloud {
        let positions = (0..n).map(|i| [i as f64, 0.0, 0.0]).collect();
        let mut boundary = vec![false; n];
        if boundary_ends {
            boundary[0] = true;
            boundary[n - 1] = true;
        }
        PointCloud::try_new(positions, boundary).unwrap()
    }

    fn chain_store(n: usize) -> Multiscale {
        Multiscale::new(NeighborGraph::from_edges(n, (1..n).map(|i| (i - 1, i))).unwrap())
            .unwrap()
    }

    #[test]
    fn similarity_metric() {
        assert_eq!(similarity(1.0, 1.0), 0.0);
        assert_eq!(similarity(0.0, 0.0), 0.0);
        assert!((similarity(3.0, 1.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn eligibility_rules() {
        let cloud = line(5, true);
        let reference = vec![1.0, 1.0, 1.0, 1.0, 10.0];
        let adjacency = GabrielAdjacency::default();
        let engine =
            CoarseningEngine::new(&cloud, &reference, &adjacency, CoarseningOptions::default())
                .unwrap();
        let store = chain_store(5);
        let graph = store.graph(0).unwrap();
        let mask = store.level_mask(0).unwrap();
        let none = HashSet::new();

        assert!(!engine.is_eligible(graph, mask, 0, 0.5, &none), "boundary");
        assert!(engine.is_eligible(graph, mask, 1, 0.5, &none));
        assert!(!engine.is_eligible(graph, mask, 3, 0.5, &none), "dissimilar neighbor");

        let mut seeds = HashSet::new();
        seeds.insert(1);
        assert!(!engine.is_eligible(graph, mask, 2, 0.5, &seeds), "adjacent seed");

        let relaxed = CoarseningEngine::new(
            &cloud,
            &reference,
            &adjacency,
            CoarseningOptions {
                forbid_adjacent_seeds: false,
            },
        )
        .unwrap();
        assert!(relaxed.is_eligible(graph, mask, 2, 0.5, &seeds));
    }

    #[test]
    fn remesh_removes_interior_ring_and_reconnects() {
        let cloud = line(5, false);
        let reference = vec![1.0; 5];
        let adjacency = GabrielAdjacency::default();
        let engine =
            CoarseningEngine::new(&cloud, &reference, &adjacency, CoarseningOptions::default())
                .unwrap();
        let mut store = chain_store(5);
        store.push_level();
        let mut level = store.deepest_level_mut();
        let report = engine.coarsen_around(&mut level, 2).unwrap();

        assert_eq!(report.removed, vec![1, 3]);
        assert_eq!(report.working_set, 3);
        assert!(!level.mask.contains(1) && !level.mask.contains(3));
        assert_eq!(level.deleted.seed_of(1), Some(2));
        assert!(level.graph.neighbors_of(1).is_empty());
        assert_eq!(level.graph.edges().collect::<Vec<_>>(), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn boundary_neighbor_reattaches_and_outer_edges_survive() {
        // 0 - 1(b) - 2(seed) - 3 - 4 - 5 - 6
        let positions = (0..7).map(|i| [i as f64, 0.0, 0.0]).collect();
        let mut boundary = vec![false; 7];
        boundary[1] = true;
        let cloud = PointCloud::try_new(positions, boundary).unwrap();
        let reference = vec![1.0; 7];
        let adjacency = GabrielAdjacency::default();
        let engine =
            CoarseningEngine::new(&cloud, &reference, &adjacency, CoarseningOptions::default())
                .unwrap();
        let mut store = chain_store(7);
        store.push_level();
        let mut level = store.deepest_level_mut();
        let report = engine.coarsen_around(&mut level, 2).unwrap();

        assert_eq!(report.removed, vec![3]);
        // second ring {1, 4} plus their outer neighbors {0, 5} and the seed
        assert_eq!(report.working_set, 5);
        assert!(level.mask.contains(1));
        assert_eq!(level.deleted.seed_of(1), None);
        assert!(level.graph.contains_edge(1, 2));
        assert!(level.graph.contains_edge(2, 4));
        assert!(level.graph.contains_edge(0, 1));
        assert!(level.graph.contains_edge(4, 5));
        assert!(level.graph.contains_edge(5, 6));
        assert_eq!(
            level.graph.edges().collect::<Vec<_>>(),
            vec![(0, 1), (1, 2), (2, 4), (4, 5), (5, 6)]
        );
        assert_eq!(report.edges_added, 2);
    }

    struct WallsOnly;

    impl LocalAdjacency for WallsOnly {
        fn compute_neighbors(
            &self,
            points: &[LocalPoint],
            _bounds: &BoundingBox,
        ) -> Vec<Vec<LocalNeighbor>> {
            points
                .iter()
                .map(|p| vec![LocalNeighbor::Wall(BoxWall::ZMin), LocalNeighbor::Point(p.id)])
                .collect()
        }
    }

    #[test]
    fn walls_and_self_reports_are_ignored() {
        let cloud = line(3, false);
        let reference = vec![1.0; 3];
        let engine =
            CoarseningEngine::new(&cloud, &reference, &WallsOnly, CoarseningOptions::default())
                .unwrap();
        let mut store = chain_store(3);
        store.push_level();
        let mut level = store.deepest_level_mut();
        let report = engine.coarsen_around(&mut level, 1).unwrap();
        assert_eq!(report.edges_added, 0);
        assert_eq!(level.graph.edge_count(), 0);
        assert_eq!(level.mask.count(), 1);
    }

    #[test]
    fn reference_length_is_checked() {
        let cloud = line(3, false);
        let adjacency = GabrielAdjacency::default();
        let err = CoarseningEngine::new(&cloud, &[1.0], &adjacency, CoarseningOptions::default())
            .err()
            .unwrap();
        assert!(err.is_configuration_error());
    }
}
