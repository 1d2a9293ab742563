//! Scheduler-facing glue: configuration, cycle policies and level queries.
//!
//! The crate does not run a solver. A caller walks a [`MultigridCycle`],
//! solves at each visited level, and runs a field transfer whenever a visit
//! [refines](LevelVisit::transfer).

pub mod cycle;
pub mod params;

pub use cycle::{CycleKind, LevelVisit, MultigridCycle};
pub use params::MultigridParams;

use crate::mesh_error::MeshError;

/// Read-only level queries consumed by an iteration driver.
pub trait LevelQueries {
    /// Index of the coarsest level.
    fn max_level(&self) -> usize;

    /// Points present at `level`.
    fn total_points_at_level(&self, level: usize) -> Result<usize, MeshError>;

    /// Point counts for every level, finest first.
    fn level_sizes(&self) -> Result<Vec<usize>, MeshError> {
        (0..=self.max_level())
            .map(|l| self.total_points_at_level(l))
            .collect()
    }
}

impl LevelQueries for crate::topology::multiscale::Multiscale {
    fn max_level(&self) -> usize {
        crate::topology::multiscale::Multiscale::max_level(self)
    }

    fn total_points_at_level(&self, level: usize) -> Result<usize, MeshError> {
        crate::topology::multiscale::Multiscale::total_points_at_level(self, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Truncated;

    impl LevelQueries for Truncated {
        fn max_level(&self) -> usize {
            2
        }

        fn total_points_at_level(&self, level: usize) -> Result<usize, MeshError> {
            if level < 2 {
                Ok(10 - level)
            } else {
                Err(MeshError::LevelOutOfRange {
                    level,
                    max_level: 1,
                })
            }
        }
    }

    #[test]
    fn level_sizes_reports_a_failing_level() {
        assert_eq!(
            Truncated.level_sizes(),
            Err(MeshError::LevelOutOfRange {
                level: 2,
                max_level: 1
            })
        );
    }
}
