//! Hierarchy and cycle configuration.

use crate::mesh_error::MeshError;
use crate::multigrid::cycle::CycleKind;

/// Parameters for building the level hierarchy and driving a cycle over it.
///
/// `cycle_selector` keeps the raw integer policy id (1 = naive, 2 = V,
/// 3 = W) so configurations loaded from files are validated like any other
/// field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MultigridParams {
    /// Index of the coarsest level to build.
    pub max_level: usize,
    /// Base similarity tolerance in `[0, 1]`.
    pub tolerance: f64,
    /// Integer cycle policy id.
    pub cycle_selector: i64,
    /// Number of cycle repetitions.
    pub max_iterations: usize,
    /// Finest level visited by the cycle.
    pub finest_level: usize,
    /// Species whose abundance drives the similarity criterion.
    pub reference_species: usize,
}

impl Default for MultigridParams {
    fn default() -> Self {
        Self {
            max_level: 3,
            tolerance: 0.1,
            cycle_selector: CycleKind::VCycle as i64,
            max_iterations: 1,
            finest_level: 0,
            reference_species: 0,
        }
    }
}

impl MultigridParams {
    /// Check every field; returns the decoded cycle policy.
    pub fn validate(&self) -> Result<CycleKind, MeshError> {
        if self.max_level == 0 {
            return Err(MeshError::InvalidConfiguration(
                "max_level must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(MeshError::InvalidConfiguration(format!(
                "tolerance {} outside [0, 1]",
                self.tolerance
            )));
        }
        if self.finest_level > self.max_level {
            return Err(MeshError::InvalidConfiguration(format!(
                "finest level {} exceeds max level {}",
                self.finest_level, self.max_level
            )));
        }
        if self.max_iterations == 0 {
            return Err(MeshError::InvalidConfiguration(
                "max_iterations must be at least 1".into(),
            ));
        }
        CycleKind::try_from(self.cycle_selector)
    }

    /// Similarity tolerance used when building `level`: `1 - (1 - tol)^level`.
    pub fn tolerance_at(&self, level: usize) -> f64 {
        let exp = i32::try_from(level).unwrap_or(i32::MAX);
        1.0 - (1.0 - self.tolerance).powi(exp)
    }
}
