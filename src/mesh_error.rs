//! MeshError: Unified error type for mesh-multiscale public APIs
//!
//! Every fallible operation in the crate returns this error. Variants fall in
//! three groups: configuration problems detected before any mutation,
//! numerical failures that abort a field-transfer pass, and precondition
//! violations on point/level/species indices.

use thiserror::Error;

/// Unified error type for mesh-multiscale operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// The point cloud contains no points.
    #[error("point cloud must contain at least one point")]
    EmptyPointCloud,
    /// A configuration value is out of its admissible range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The cycle-policy selector does not name a known traversal.
    #[error("unknown cycle policy selector {0}")]
    UnknownCyclePolicy(i64),
    /// Two per-point tables disagree in length.
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Input coordinates are not usable (non-finite values).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A point index outside `[0, len)`.
    #[error("point {point} out of range (cloud has {len} points)")]
    PointOutOfRange { point: usize, len: usize },
    /// A level index beyond the deepest level built.
    #[error("level {level} out of range (deepest level is {max_level})")]
    LevelOutOfRange { level: usize, max_level: usize },
    /// Levels below the deepest one are read-only.
    #[error("level {level} is frozen; only level {max_level} can be mutated")]
    FrozenLevel { level: usize, max_level: usize },
    /// A transfer must go from a strictly coarser level to a finer one.
    #[error("invalid level pair: source {source_level} must be coarser than destination {dest_level}")]
    InvalidLevelPair {
        source_level: usize,
        dest_level: usize,
    },
    /// A species index outside the abundance table.
    #[error("species {species} out of range ({num_species} species)")]
    SpeciesOutOfRange { species: usize, num_species: usize },
    /// Attempted to connect a point to itself.
    #[error("self-loop on point {0} is not allowed")]
    SelfLoop(usize),
    /// A structural invariant of the level hierarchy does not hold.
    #[error("invariant violated at level {level}: {detail}")]
    InvariantViolation { level: usize, detail: String },
    /// Interpolation produced NaN or an infinity.
    #[error("non-finite interpolated value {value} at point {point}")]
    NonFiniteInterpolation { point: usize, value: f64 },
    /// All clamped fractions of a species vanished; cannot renormalize.
    #[error("fractions of species {species} sum to zero at point {point}")]
    ZeroFractionSum { point: usize, species: usize },
}

impl MeshError {
    /// True for errors raised by validation before any state was mutated.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            MeshError::EmptyPointCloud
                | MeshError::InvalidConfiguration(_)
                | MeshError::UnknownCyclePolicy(_)
                | MeshError::LengthMismatch { .. }
                | MeshError::InvalidGeometry(_)
        )
    }

    /// True for failures of the interpolation arithmetic.
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            MeshError::NonFiniteInterpolation { .. } | MeshError::ZeroFractionSum { .. }
        )
    }
}
