//! Symmetric point-to-point neighbor graph for one level.
//!
//! Neighbor sets are ordered so iteration is deterministic. Every mutator
//! updates both endpoints, so `q ∈ neighbors(p) ⟺ p ∈ neighbors(q)` holds
//! after every call, and self-loops are rejected.

use std::collections::BTreeSet;

use crate::algs::adjacency_graph::AdjacencyGraph;
use crate::geometry::adjacency::{LocalAdjacency, LocalPoint};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::positions::PositionProvider;
use crate::mesh_error::MeshError;
use crate::topology::mask::LevelMask;

/// Per-point neighbor sets of one level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl NeighborGraph {
    /// Graph over `num_points` isolated points.
    pub fn new(num_points: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); num_points],
        }
    }

    /// Build from an undirected edge list; each edge is inserted both ways.
    pub fn from_edges<I>(num_points: usize, edges: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = Self::new(num_points);
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Build the full-resolution graph by running the local-adjacency
    /// primitive over the whole cloud at once.
    ///
    /// Intended for modest clouds; large inputs should import a graph from
    /// a dedicated triangulator through [`NeighborGraph::from_edges`].
    pub fn from_local_adjacency<P, A>(positions: &P, adjacency: &A) -> Result<Self, MeshError>
    where
        P: PositionProvider,
        A: LocalAdjacency,
    {
        if positions.is_empty() {
            return Err(MeshError::EmptyPointCloud);
        }
        let points: Vec<LocalPoint> = (0..positions.len())
            .map(|id| LocalPoint {
                id,
                position: positions.position(id),
            })
            .collect();
        let bounds = BoundingBox::around(points.iter().map(|p| p.position))
            .ok_or(MeshError::EmptyPointCloud)?
            .inflated();
        let reported = adjacency.compute_neighbors(&points, &bounds);
        let mut graph = Self::new(points.len());
        for (point, list) in points.iter().zip(reported) {
            for q in list.into_iter().filter_map(|n| n.point()) {
                if q != point.id {
                    graph.add_edge(point.id, q)?;
                }
            }
        }
        Ok(graph)
    }

    /// Number of points (connected or not) the graph spans.
    #[inline]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    #[inline]
    fn check(&self, p: usize) -> Result<(), MeshError> {
        if p < self.adjacency.len() {
            Ok(())
        } else {
            Err(MeshError::PointOutOfRange {
                point: p,
                len: self.adjacency.len(),
            })
        }
    }

    /// Neighbor set of `p`.
    pub fn neighbors(&self, p: usize) -> Result<&BTreeSet<usize>, MeshError> {
        self.check(p)?;
        Ok(&self.adjacency[p])
    }

    /// Neighbor set of an id already known to be in range.
    #[inline]
    pub(crate) fn neighbors_of(&self, p: usize) -> &BTreeSet<usize> {
        &self.adjacency[p]
    }

    /// Whether `a` and `b` are adjacent; out-of-range ids are never adjacent.
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Insert the undirected edge `a–b`. Returns `true` if it was new.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<bool, MeshError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(MeshError::SelfLoop(a));
        }
        let inserted = self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        Ok(inserted)
    }

    /// Remove the undirected edge `a–b`. Returns `true` if it existed.
    pub fn remove_edge(&mut self, a: usize, b: usize) -> Result<bool, MeshError> {
        self.check(a)?;
        self.check(b)?;
        let removed = self.adjacency[a].remove(&b);
        self.adjacency[b].remove(&a);
        Ok(removed)
    }

    /// Disconnect `p` from every neighbor and return the former neighbors.
    pub fn isolate(&mut self, p: usize) -> Result<BTreeSet<usize>, MeshError> {
        self.check(p)?;
        let old = std::mem::take(&mut self.adjacency[p]);
        for &q in &old {
            self.adjacency[q].remove(&p);
        }
        Ok(old)
    }

    /// Number of neighbors of `p`.
    pub fn degree(&self, p: usize) -> Result<usize, MeshError> {
        Ok(self.neighbors(p)?.len())
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Undirected edges as `(low, high)` pairs in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, set)| set.range(a + 1..).map(move |&b| (a, b)))
    }

    /// CSR export over the points present in `mask`.
    pub fn to_csr(&self, mask: &LevelMask) -> AdjacencyGraph {
        AdjacencyGraph::from_level(self, mask)
    }
}
