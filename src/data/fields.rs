//! Full-resolution per-point fields overwritten by field transfer.

use crate::mesh_error::MeshError;

/// A field with `width` components per point, stored point-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PointField {
    width: usize,
    values: Vec<f64>,
}

impl PointField {
    /// Zero-initialized field.
    pub fn zeros(num_points: usize, width: usize) -> Self {
        Self {
            width,
            values: vec![0.0; num_points * width],
        }
    }

    /// Wrap point-major values; `values.len()` must be a multiple of `width`.
    pub fn from_values(width: usize, values: Vec<f64>) -> Result<Self, MeshError> {
        if width == 0 {
            return Err(MeshError::InvalidConfiguration(
                "field width must be positive".into(),
            ));
        }
        if values.len() % width != 0 {
            return Err(MeshError::LengthMismatch {
                what: "point field",
                expected: (values.len() / width + 1) * width,
                found: values.len(),
            });
        }
        Ok(Self { width, values })
    }

    /// Scalar field, one value per point.
    pub fn scalar(values: Vec<f64>) -> Self {
        Self { width: 1, values }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.values.len() / self.width
        }
    }

    /// Components of point `p`.
    pub fn get(&self, p: usize) -> Result<&[f64], MeshError> {
        let len = self.num_points();
        if p >= len {
            return Err(MeshError::PointOutOfRange { point: p, len });
        }
        Ok(&self.values[p * self.width..(p + 1) * self.width])
    }

    /// Overwrite the components of point `p`.
    pub fn set(&mut self, p: usize, data: &[f64]) -> Result<(), MeshError> {
        let len = self.num_points();
        if p >= len {
            return Err(MeshError::PointOutOfRange { point: p, len });
        }
        if data.len() != self.width {
            return Err(MeshError::LengthMismatch {
                what: "point field slice",
                expected: self.width,
                found: data.len(),
            });
        }
        self.values[p * self.width..(p + 1) * self.width].copy_from_slice(data);
        Ok(())
    }

    /// Component `component` of every point listed in `points`.
    pub(crate) fn gather(&self, points: &[usize], component: usize) -> Vec<f64> {
        points
            .iter()
            .map(|&p| self.values[p * self.width + component])
            .collect()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Absolute level populations, one [`PointField`] per species whose width is
/// that species' number of energy levels.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPopulations {
    species: Vec<PointField>,
}

impl LevelPopulations {
    /// All species must cover the same number of points.
    pub fn try_new(species: Vec<PointField>) -> Result<Self, MeshError> {
        if let Some(first) = species.first() {
            let n = first.num_points();
            if let Some(bad) = species.iter().find(|f| f.num_points() != n) {
                return Err(MeshError::LengthMismatch {
                    what: "species populations",
                    expected: n,
                    found: bad.num_points(),
                });
            }
        }
        Ok(Self { species })
    }

    #[inline]
    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    /// Points covered (zero when no species are stored).
    pub fn num_points(&self) -> usize {
        self.species.first().map_or(0, PointField::num_points)
    }

    pub fn species(&self, s: usize) -> Result<&PointField, MeshError> {
        self.species.get(s).ok_or(MeshError::SpeciesOutOfRange {
            species: s,
            num_species: self.species.len(),
        })
    }

    pub fn species_mut(&mut self, s: usize) -> Result<&mut PointField, MeshError> {
        let num_species = self.species.len();
        self.species
            .get_mut(s)
            .ok_or(MeshError::SpeciesOutOfRange {
                species: s,
                num_species,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointField> {
        self.species.iter()
    }
}
