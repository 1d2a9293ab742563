//! CSR export of a level's neighbor graph.
//!
//! Vertex indices refer to positions in `order`, the ascending list of points
//! present at the level. Neighbor lists are sorted and contain only present
//! points, so the export is deterministic for a given hierarchy.

use crate::topology::mask::LevelMask;
use crate::topology::neighbors::NeighborGraph;

/// CSR-style adjacency graph for a chosen point ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph {
    /// CSR offsets into `adjncy` for each vertex.
    pub xadj: Vec<usize>,
    /// CSR adjacency list (indices into `order`).
    pub adjncy: Vec<usize>,
    /// Point ordering that defines vertex indices.
    pub order: Vec<usize>,
}

impl AdjacencyGraph {
    /// Return the neighbor index slice for vertex `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjncy[self.xadj[i]..self.xadj[i + 1]]
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.order.len()
    }

    /// Build from one level, keeping only points present in `mask`.
    pub fn from_level(graph: &NeighborGraph, mask: &LevelMask) -> Self {
        let order: Vec<usize> = mask.active_points().collect();
        // point id -> vertex index; usize::MAX marks absent points
        let mut index = vec![usize::MAX; graph.len()];
        for (i, &p) in order.iter().enumerate() {
            index[p] = i;
        }

        let mut xadj = Vec::with_capacity(order.len() + 1);
        let mut adjncy = Vec::new();
        xadj.push(0);
        for &p in &order {
            adjncy.extend(
                graph
                    .neighbors_of(p)
                    .iter()
                    .map(|&q| index[q])
                    .filter(|&v| v != usize::MAX),
            );
            xadj.push(adjncy.len());
        }
        Self {
            xadj,
            adjncy,
            order,
        }
    }
}
