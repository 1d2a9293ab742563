//! Coarse-to-fine field transfer over a level hierarchy.
//!
//! Values at points present on a coarser `source` level are interpolated
//! onto the difference points of a finer `dest` level (present at `dest`,
//! absent at `source`). Each difference point gets its own RBF stencil of the
//! nearest source-level points.
//!
//! Two modes are supported:
//! - [`FieldTransfer::relative_differences`] interpolates a per-point field
//!   as-is.
//! - [`FieldTransfer::level_populations`] interpolates population fractions
//!   relative to the local abundance, clamps them to be non-negative,
//!   renormalizes them, and scales back by the abundance at the target.
//!
//! Results are computed for every difference point before anything is
//! written, so a failing pass leaves the output untouched.

use crate::algs::interpolate::{InterpolationOptions, RbfStencil};
use crate::algs::nearest::NearestNeighborIndex;
use crate::data::abundance::AbundanceProvider;
use crate::data::fields::{LevelPopulations, PointField};
use crate::geometry::positions::PositionProvider;
use crate::mesh_error::MeshError;
use crate::topology::hierarchy::MultiscaleMesh;

/// Summary of one transfer pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub source: usize,
    pub dest: usize,
    /// Difference points written.
    pub points: usize,
    /// Points filled by direct copy because their stencil was degenerate.
    pub copied: usize,
}

/// Interpolates fields from coarser to finer levels of one hierarchy.
pub struct FieldTransfer<'a, P> {
    mesh: &'a MultiscaleMesh<P>,
    options: InterpolationOptions,
}

/// Per-point map, in parallel with the `rayon` feature. Output order
/// follows `items`.
fn map_points<I, T, F>(items: &[I], f: F) -> Result<Vec<T>, MeshError>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<T, MeshError> + Sync + Send,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        items.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        items.iter().map(f).collect()
    }
}

fn check_finite(point: usize, values: &[f64]) -> Result<(), MeshError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(MeshError::NonFiniteInterpolation { point, value }),
        None => Ok(()),
    }
}

impl<'a, P> FieldTransfer<'a, P>
where
    P: PositionProvider + Sync,
{
    pub fn new(
        mesh: &'a MultiscaleMesh<P>,
        options: InterpolationOptions,
    ) -> Result<Self, MeshError> {
        options.validate()?;
        Ok(Self { mesh, options })
    }

    #[inline]
    pub fn options(&self) -> InterpolationOptions {
        self.options
    }

    fn check_levels(&self, source: usize, dest: usize) -> Result<(), MeshError> {
        let max_level = self.mesh.max_level();
        for level in [source, dest] {
            if level > max_level {
                return Err(MeshError::LevelOutOfRange { level, max_level });
            }
        }
        if source <= dest {
            return Err(MeshError::InvalidLevelPair {
                source_level: source,
                dest_level: dest,
            });
        }
        Ok(())
    }

    fn check_points(&self, what: &'static str, found: usize) -> Result<(), MeshError> {
        let expected = self.mesh.num_points();
        if found != expected {
            return Err(MeshError::LengthMismatch {
                what,
                expected,
                found,
            });
        }
        Ok(())
    }

    fn stencil_for(
        &self,
        index: &NearestNeighborIndex,
        source: usize,
        p: usize,
    ) -> Result<RbfStencil, MeshError> {
        let target = self.mesh.cloud().position(p);
        let members = index.nearest(target, self.options.stencil_size);
        let nearest = members.first().copied();
        if let Some(stencil) = RbfStencil::new(self.mesh.cloud(), target, members) {
            return Ok(stencil);
        }
        let mask = self.mesh.store().level_mask(source)?;
        let fallback = self
            .mesh
            .deleted()
            .resolve(p, |q| mask.contains(q))
            .or(nearest)
            .ok_or(MeshError::EmptyPointCloud)?;
        log::debug!("point {p}: degenerate stencil, copying from {fallback}");
        Ok(RbfStencil::single(fallback))
    }

    /// Difference points and their stencils for `source -> dest`.
    fn plan(&self, source: usize, dest: usize) -> Result<Vec<(usize, RbfStencil)>, MeshError> {
        self.check_levels(source, dest)?;
        let active = self.mesh.active_points(source)?;
        let index = NearestNeighborIndex::build(self.mesh.cloud(), &active)?;
        let targets = self.mesh.difference_points(source, dest)?;
        map_points(&targets, |&p| Ok((p, self.stencil_for(&index, source, p)?)))
    }

    fn report(&self, source: usize, dest: usize, plan: &[(usize, RbfStencil)]) -> TransferReport {
        TransferReport {
            source,
            dest,
            points: plan.len(),
            copied: plan.iter().filter(|(_, s)| s.is_copy()).count(),
        }
    }

    /// Interpolate every component of `field` from `source` onto the
    /// difference points of `dest`.
    pub fn relative_differences(
        &self,
        source: usize,
        dest: usize,
        field: &mut PointField,
    ) -> Result<TransferReport, MeshError> {
        self.check_levels(source, dest)?;
        self.check_points("relative-difference field", field.num_points())?;
        let plan = self.plan(source, dest)?;

        let snapshot: &PointField = field;
        let results = map_points(&plan, |(p, stencil)| {
            let columns: Vec<Vec<f64>> = (0..snapshot.width())
                .map(|c| snapshot.gather(stencil.members(), c))
                .collect();
            let values = stencil.interpolate_columns(&columns);
            check_finite(*p, &values)?;
            Ok(values)
        })?;

        for ((p, _), values) in plan.iter().zip(&results) {
            field.set(*p, values)?;
        }
        let report = self.report(source, dest, &plan);
        log::debug!(
            "relative differences {source} -> {dest}: {} points ({} copied)",
            report.points,
            report.copied
        );
        Ok(report)
    }

    /// Interpolate level populations species by species as fractions of the
    /// local abundance.
    pub fn level_populations<Ab>(
        &self,
        source: usize,
        dest: usize,
        abundances: &Ab,
        populations: &mut LevelPopulations,
    ) -> Result<TransferReport, MeshError>
    where
        Ab: AbundanceProvider + Sync,
    {
        self.check_levels(source, dest)?;
        self.check_points("abundance table", abundances.num_points())?;
        self.check_points("level populations", populations.num_points())?;
        if populations.num_species() != abundances.num_species() {
            return Err(MeshError::LengthMismatch {
                what: "species",
                expected: abundances.num_species(),
                found: populations.num_species(),
            });
        }
        let plan = self.plan(source, dest)?;

        let snapshot: &LevelPopulations = populations;
        let results = map_points(&plan, |(p, stencil)| {
            snapshot
                .iter()
                .enumerate()
                .map(|(s, field)| -> Result<Vec<f64>, MeshError> {
                    let columns: Vec<Vec<f64>> = (0..field.width())
                        .map(|level| {
                            stencil
                                .members()
                                .iter()
                                .zip(field.gather(stencil.members(), level))
                                .map(|(&m, pop)| fraction(pop, abundances.abundance(m, s)))
                                .collect()
                        })
                        .collect();
                    let mut fractions = stencil.interpolate_columns(&columns);
                    check_finite(*p, &fractions)?;
                    for f in &mut fractions {
                        *f = f.max(0.0);
                    }
                    let sum: f64 = fractions.iter().sum();
                    if sum == 0.0 {
                        return Err(MeshError::ZeroFractionSum {
                            point: *p,
                            species: s,
                        });
                    }
                    let scale = abundances.abundance(*p, s) / sum;
                    Ok(fractions.into_iter().map(|f| f * scale).collect())
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        for ((p, _), per_species) in plan.iter().zip(&results) {
            for (s, values) in per_species.iter().enumerate() {
                populations.species_mut(s)?.set(*p, values)?;
            }
        }
        let report = self.report(source, dest, &plan);
        log::debug!(
            "level populations {source} -> {dest}: {} points ({} copied)",
            report.points,
            report.copied
        );
        Ok(report)
    }
}

/// Population relative to abundance; a vanishing abundance contributes zero.
#[inline]
fn fraction(population: f64, abundance: f64) -> f64 {
    if abundance == 0.0 {
        0.0
    } else {
        population / abundance
    }
}
