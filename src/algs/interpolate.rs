//! Gaussian radial-basis interpolation over small stencils.
//!
//! For a stencil `x_1..x_n` around a target `x`, distances are scaled by the
//! mean pairwise stencil distance `d̄`. The Gram matrix
//! `G_ij = φ(|x_i - x_j| / d̄)` is factored once with partial pivoting and
//! reused for every field interpolated at that target.

use faer::Mat;
use faer::linalg::solvers::{PartialPivLu, Solve};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::positions::{PositionProvider, distance};
use crate::mesh_error::MeshError;

/// Stencil size for 3-D clouds.
pub const DEFAULT_STENCIL_SIZE: usize = 8;

/// Interpolation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationOptions {
    /// Number of nearest coarse points in each stencil.
    pub stencil_size: usize,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            stencil_size: DEFAULT_STENCIL_SIZE,
        }
    }
}

impl InterpolationOptions {
    /// Conventional stencil size for a 1-, 2- or 3-dimensional cloud.
    pub fn for_dimension(dimension: usize) -> Self {
        let stencil_size = match dimension {
            1 => 3,
            2 => 6,
            _ => DEFAULT_STENCIL_SIZE,
        };
        Self { stencil_size }
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.stencil_size == 0 {
            return Err(MeshError::InvalidConfiguration(
                "stencil_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Gaussian kernel `exp(-r²)`.
#[inline]
pub fn gaussian(r: f64) -> f64 {
    (-r * r).exp()
}

enum Weights {
    Kernel {
        lu: PartialPivLu<f64>,
        /// `φ(|x - x_i| / d̄)` for each member.
        phi: Vec<f64>,
    },
    Copy,
}

/// Factored interpolation weights for one target point.
pub struct RbfStencil {
    members: Vec<usize>,
    weights: Weights,
}

impl RbfStencil {
    /// Factor the kernel system for `members` around `target`.
    ///
    /// Returns `None` for a degenerate stencil: fewer than two members or
    /// all members coincident.
    pub fn new<P: PositionProvider>(
        positions: &P,
        target: [f64; 3],
        members: Vec<usize>,
    ) -> Option<Self> {
        let n = members.len();
        if n < 2 {
            return None;
        }
        let coords: Vec<[f64; 3]> = members.iter().map(|&m| positions.position(m)).collect();
        let pairs = n * (n - 1) / 2;
        let mean = coords
            .iter()
            .tuple_combinations()
            .map(|(a, b)| distance(*a, *b))
            .sum::<f64>()
            / pairs as f64;
        if !(mean.is_finite() && mean > 0.0) {
            return None;
        }

        let gram = Mat::<f64>::from_fn(n, n, |i, j| gaussian(distance(coords[i], coords[j]) / mean));
        let phi = coords
            .iter()
            .map(|&c| gaussian(distance(target, c) / mean))
            .collect();
        Some(Self {
            members,
            weights: Weights::Kernel {
                lu: gram.partial_piv_lu(),
                phi,
            },
        })
    }

    /// Direct copy from one point.
    pub fn single(source: usize) -> Self {
        Self {
            members: vec![source],
            weights: Weights::Copy,
        }
    }

    /// Points whose values feed the stencil, in query order.
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    #[inline]
    pub fn is_copy(&self) -> bool {
        matches!(self.weights, Weights::Copy)
    }

    /// Interpolate one field given its values at `members()`.
    pub fn interpolate(&self, values: &[f64]) -> f64 {
        self.interpolate_columns(&[values.to_vec()])[0]
    }

    /// Interpolate several fields at once, one column per field, each
    /// aligned with `members()`.
    pub fn interpolate_columns(&self, columns: &[Vec<f64>]) -> Vec<f64> {
        match &self.weights {
            Weights::Copy => columns.iter().map(|col| col[0]).collect(),
            Weights::Kernel { lu, phi } => {
                let n = self.members.len();
                let rhs = Mat::<f64>::from_fn(n, columns.len(), |i, j| columns[j][i]);
                let coeffs = lu.solve(rhs);
                (0..columns.len())
                    .map(|j| (0..n).map(|i| phi[i] * coeffs[(i, j)]).sum())
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::positions::PointCloud;

    fn line(xs: &[f64]) -> PointCloud {
        PointCloud::interior(xs.iter().map(|&x| [x, 0.0, 0.0]).collect()).unwrap()
    }

    #[test]
    fn reproduces_values_at_nodes() {
        let c = line(&[0.0, 1.0, 2.0]);
        let s = RbfStencil::new(&c, [1.0, 0.0, 0.0], vec![0, 1, 2]).unwrap();
        let v = s.interpolate(&[3.0, -1.0, 4.0]);
        assert!((v + 1.0).abs() < 1e-10, "{v}");
    }

    #[test]
    fn symmetric_data_gives_symmetric_results() {
        let c = line(&[-1.0, 0.0, 1.0]);
        let left = RbfStencil::new(&c, [-0.5, 0.0, 0.0], vec![0, 1, 2]).unwrap();
        let right = RbfStencil::new(&c, [0.5, 0.0, 0.0], vec![0, 1, 2]).unwrap();
        let a = left.interpolate(&[2.0, 1.0, 2.0]);
        let b = right.interpolate(&[2.0, 1.0, 2.0]);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn columns_share_one_factorization() {
        let c = line(&[0.0, 1.0, 3.0]);
        let s = RbfStencil::new(&c, [2.0, 0.0, 0.0], vec![0, 1, 2]).unwrap();
        let both = s.interpolate_columns(&[vec![1.0, 2.0, 3.0], vec![0.0, 5.0, 1.0]]);
        assert!((both[0] - s.interpolate(&[1.0, 2.0, 3.0])).abs() < 1e-12);
        assert!((both[1] - s.interpolate(&[0.0, 5.0, 1.0])).abs() < 1e-12);
    }

    #[test]
    fn degenerate_stencils() {
        let c = line(&[1.0, 1.0, 2.0]);
        assert!(RbfStencil::new(&c, [0.0; 3], vec![2]).is_none());
        assert!(RbfStencil::new(&c, [0.0; 3], vec![0, 1]).is_none());
        let copy = RbfStencil::single(2);
        assert!(copy.is_copy());
        assert_eq!(copy.interpolate_columns(&[vec![7.0], vec![8.0]]), vec![7.0, 8.0]);
    }

    #[test]
    fn stencil_sizes_by_dimension() {
        assert_eq!(InterpolationOptions::for_dimension(1).stencil_size, 3);
        assert_eq!(InterpolationOptions::for_dimension(2).stencil_size, 6);
        assert_eq!(InterpolationOptions::default().stencil_size, 8);
        assert!(InterpolationOptions { stencil_size: 0 }.validate().is_err());
    }
}
