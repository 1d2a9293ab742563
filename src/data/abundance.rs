//! Per-point, per-species abundances.
//!
//! Abundances are frozen at load time. They serve two purposes: the
//! reference field compared by the coarsening similarity criterion, and the
//! scale that turns absolute level populations into fractions during field
//! transfer.

use crate::mesh_error::MeshError;

/// Read-only scalar lookups supplied by the chemistry model.
pub trait AbundanceProvider {
    fn num_points(&self) -> usize;

    fn num_species(&self) -> usize;

    /// Abundance of `species` at point `id`. Both indices are in range.
    fn abundance(&self, id: usize, species: usize) -> f64;

    /// One species as a dense per-point column.
    fn species_column(&self, species: usize) -> Result<Vec<f64>, MeshError> {
        if species >= self.num_species() {
            return Err(MeshError::SpeciesOutOfRange {
                species,
                num_species: self.num_species(),
            });
        }
        Ok((0..self.num_points())
            .map(|id| self.abundance(id, species))
            .collect())
    }
}

/// Dense abundance table stored point-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Abundances {
    num_points: usize,
    num_species: usize,
    values: Vec<f64>,
}

impl Abundances {
    /// Wrap a point-major table (`values[id * num_species + species]`).
    pub fn try_new(
        num_points: usize,
        num_species: usize,
        values: Vec<f64>,
    ) -> Result<Self, MeshError> {
        if num_points == 0 {
            return Err(MeshError::EmptyPointCloud);
        }
        if num_species == 0 {
            return Err(MeshError::InvalidConfiguration(
                "abundance table needs at least one species".into(),
            ));
        }
        let expected = num_points * num_species;
        if values.len() != expected {
            return Err(MeshError::LengthMismatch {
                what: "abundance table",
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            num_points,
            num_species,
            values,
        })
    }

    /// Single-species table.
    pub fn single(values: Vec<f64>) -> Result<Self, MeshError> {
        Self::try_new(values.len(), 1, values)
    }

    /// Every point and species set to `value`.
    pub fn uniform(num_points: usize, num_species: usize, value: f64) -> Result<Self, MeshError> {
        Self::try_new(num_points, num_species, vec![value; num_points * num_species])
    }
}

impl AbundanceProvider for Abundances {
    #[inline]
    fn num_points(&self) -> usize {
        self.num_points
    }

    #[inline]
    fn num_species(&self) -> usize {
        self.num_species
    }

    #[inline]
    fn abundance(&self, id: usize, species: usize) -> f64 {
        self.values[id * self.num_species + species]
    }
}
