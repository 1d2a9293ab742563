//! Fixed-k nearest-neighbor queries over one level's present points.
//!
//! The index is a value built per interpolation pass and never mutated.
//! Results are ordered by `(distance, id)`, so ties at the cut-off are broken
//! by the smaller global id rather than by tree layout.

use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::geometry::positions::{PositionProvider, squared_distance};
use crate::mesh_error::MeshError;

type IndexedPoint = GeomWithData<[f64; 3], usize>;

/// R-tree over a subset of a point cloud, keyed by global id.
pub struct NearestNeighborIndex {
    tree: RTree<IndexedPoint>,
}

impl NearestNeighborIndex {
    /// Index the points `ids` of `positions`.
    pub fn build<P: PositionProvider>(positions: &P, ids: &[usize]) -> Result<Self, MeshError> {
        let items = ids
            .iter()
            .map(|&id| {
                if id < positions.len() {
                    Ok(GeomWithData::new(positions.position(id), id))
                } else {
                    Err(MeshError::PointOutOfRange {
                        point: id,
                        len: positions.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tree: RTree::bulk_load(items),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Up to `k` nearest ids with their squared distances.
    pub fn nearest_with_distance_2(&self, query: [f64; 3], k: usize) -> Vec<(usize, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let mut found: Vec<(usize, f64)> = Vec::with_capacity(k + 1);
        for item in self.tree.nearest_neighbor_iter(&query) {
            let d2 = squared_distance(*item.geom(), query);
            // keep pulling equidistant candidates past the k-th
            if found.len() >= k && found.last().is_some_and(|&(_, last)| d2 > last) {
                break;
            }
            found.push((item.data, d2));
        }
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found.truncate(k);
        found
    }

    /// Up to `k` nearest ids, closest first.
    pub fn nearest(&self, query: [f64; 3], k: usize) -> Vec<usize> {
        self.nearest_with_distance_2(query, k)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }
}
