//! Frozen point positions and boundary flags.
//!
//! Positions are supplied once at load time and never change afterwards. The
//! [`PositionProvider`] trait is the read-only view every other component
//! consumes; [`PointCloud`] is the owned implementation.

use crate::mesh_error::MeshError;

/// Read-only access to per-point coordinates and boundary classification.
pub trait PositionProvider {
    /// Number of points; valid ids are `0..len()`.
    fn len(&self) -> usize;

    /// Coordinates of point `id`.
    fn position(&self, id: usize) -> [f64; 3];

    /// Whether `id` lies on the domain boundary (never coarsened away).
    fn is_boundary(&self, id: usize) -> bool;

    /// True when the provider holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned 3-D point cloud with a boundary flag per point.
#[derive(Clone, Debug)]
pub struct PointCloud {
    positions: Vec<[f64; 3]>,
    boundary: Vec<bool>,
}

impl PointCloud {
    /// Build a cloud, validating that both tables agree, the cloud is not
    /// empty and every coordinate is finite.
    pub fn try_new(positions: Vec<[f64; 3]>, boundary: Vec<bool>) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::EmptyPointCloud);
        }
        if boundary.len() != positions.len() {
            return Err(MeshError::LengthMismatch {
                what: "boundary flags",
                expected: positions.len(),
                found: boundary.len(),
            });
        }
        if let Some((id, pos)) = positions
            .iter()
            .enumerate()
            .find(|(_, pos)| pos.iter().any(|c| !c.is_finite()))
        {
            return Err(MeshError::InvalidGeometry(format!(
                "point {id} has non-finite coordinates {pos:?}"
            )));
        }
        Ok(Self {
            positions,
            boundary,
        })
    }

    /// Convenience constructor for a cloud without boundary points.
    pub fn interior(positions: Vec<[f64; 3]>) -> Result<Self, MeshError> {
        let boundary = vec![false; positions.len()];
        Self::try_new(positions, boundary)
    }

    /// Fallible position lookup.
    pub fn try_position(&self, id: usize) -> Result<[f64; 3], MeshError> {
        self.positions
            .get(id)
            .copied()
            .ok_or(MeshError::PointOutOfRange {
                point: id,
                len: self.positions.len(),
            })
    }

    /// All positions in id order.
    #[inline]
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    /// Ids of all boundary points in ascending order.
    pub fn boundary_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.boundary
            .iter()
            .enumerate()
            .filter_map(|(id, &b)| b.then_some(id))
    }
}

impl PositionProvider for PointCloud {
    #[inline]
    fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    fn position(&self, id: usize) -> [f64; 3] {
        self.positions[id]
    }

    #[inline]
    fn is_boundary(&self, id: usize) -> bool {
        self.boundary[id]
    }
}

/// Euclidean distance between two positions.
#[inline]
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Squared Euclidean distance between two positions.
#[inline]
pub fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(lhs, rhs)| {
            let diff = lhs - rhs;
            diff * diff
        })
        .sum()
}
