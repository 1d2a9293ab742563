//! Level hierarchy construction.
//!
//! [`HierarchyBuilder::setup`] validates the configuration, then grows the
//! hierarchy one level at a time: level `l` starts as a copy of level
//! `l - 1` and is coarsened with tolerance `1 - (1 - tol)^l`, so deeper
//! levels accept increasingly dissimilar neighbors.

use std::collections::BTreeSet;

use crate::algs::adjacency_graph::AdjacencyGraph;
use crate::data::abundance::AbundanceProvider;
use crate::geometry::adjacency::LocalAdjacency;
use crate::geometry::positions::{PointCloud, PositionProvider};
use crate::mesh_error::MeshError;
use crate::multigrid::{CycleKind, LevelQueries, MultigridCycle, MultigridParams};
use crate::topology::coarsen::{CoarseningEngine, CoarseningOptions, LevelReport};
use crate::topology::deleted::DeletedPointMap;
use crate::topology::multiscale::Multiscale;
use crate::topology::neighbors::NeighborGraph;
use crate::topology::validation::{DebugInvariants, check_boundary};

/// Inputs for building a [`MultiscaleMesh`].
pub struct HierarchyBuilder<P, A> {
    cloud: P,
    base: NeighborGraph,
    adjacency: A,
    options: CoarseningOptions,
}

impl<P, A> HierarchyBuilder<P, A>
where
    P: PositionProvider,
    A: LocalAdjacency,
{
    /// `base` is the full-resolution neighbor graph over `cloud`.
    pub fn new(cloud: P, base: NeighborGraph, adjacency: A) -> Self {
        Self {
            cloud,
            base,
            adjacency,
            options: CoarseningOptions::default(),
        }
    }

    /// Override the seed-selection policy.
    pub fn coarsening(mut self, options: CoarseningOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the hierarchy with the reference field taken from
    /// `params.reference_species` of `abundances`.
    pub fn setup<Ab: AbundanceProvider>(
        self,
        abundances: &Ab,
        params: &MultigridParams,
    ) -> Result<MultiscaleMesh<P>, MeshError> {
        if abundances.num_points() != self.cloud.len() {
            return Err(MeshError::LengthMismatch {
                what: "abundance table",
                expected: self.cloud.len(),
                found: abundances.num_points(),
            });
        }
        let reference = abundances.species_column(params.reference_species)?;
        self.setup_with_reference(&reference, params)
    }

    /// Build the hierarchy against an explicit per-point reference field.
    ///
    /// Every input is validated before any level is built.
    pub fn setup_with_reference(
        self,
        reference: &[f64],
        params: &MultigridParams,
    ) -> Result<MultiscaleMesh<P>, MeshError> {
        let cycle_kind = params.validate()?;
        if self.cloud.is_empty() {
            return Err(MeshError::EmptyPointCloud);
        }
        if params.max_level >= self.cloud.len() {
            return Err(MeshError::InvalidConfiguration(format!(
                "max level {} needs more than {} points",
                params.max_level,
                self.cloud.len()
            )));
        }
        if self.base.len() != self.cloud.len() {
            return Err(MeshError::LengthMismatch {
                what: "base neighbor graph",
                expected: self.cloud.len(),
                found: self.base.len(),
            });
        }
        let cycle = MultigridCycle::new(
            cycle_kind,
            params.max_level,
            params.finest_level,
            params.max_iterations,
        )?;

        let HierarchyBuilder {
            cloud,
            base,
            adjacency,
            options,
        } = self;
        let engine = CoarseningEngine::new(&cloud, reference, &adjacency, options)?;
        let mut store = Multiscale::new(base)?;
        log::info!(
            "multiscale setup: {} points, {} levels, tol {}, {:?}",
            cloud.len(),
            params.max_level + 1,
            params.tolerance,
            cycle_kind
        );

        let mut reports = Vec::with_capacity(params.max_level);
        for level in 1..=params.max_level {
            let report = engine.coarsen_level(&mut store, params.tolerance_at(level))?;
            log::info!(
                "level {}: tol {:.4}, {} seeds, {} removed, {} remain",
                report.level,
                report.tolerance,
                report.seeds.len(),
                report.removed,
                report.remaining
            );
            if report.seeds.is_empty() {
                log::debug!("level {level}: no eligible seeds, level repeats its parent");
            }
            crate::debug_invariants!(store.validate_invariants(), "after coarsening");
            crate::debug_invariants!(
                check_boundary(level, &cloud, store.level_mask(level)?),
                "boundary after coarsening"
            );
            reports.push(report);
        }

        Ok(MultiscaleMesh {
            cloud,
            store,
            params: params.clone(),
            cycle_kind,
            cycle,
            reports,
        })
    }
}

/// A built level hierarchy over a frozen point cloud.
#[derive(Clone, Debug)]
pub struct MultiscaleMesh<P = PointCloud> {
    cloud: P,
    store: Multiscale,
    params: MultigridParams,
    cycle_kind: CycleKind,
    cycle: MultigridCycle,
    reports: Vec<LevelReport>,
}

impl<P: PositionProvider> MultiscaleMesh<P> {
    pub fn cloud(&self) -> &P {
        &self.cloud
    }

    /// Raw per-level masks and graphs.
    pub fn store(&self) -> &Multiscale {
        &self.store
    }

    pub fn params(&self) -> &MultigridParams {
        &self.params
    }

    pub fn cycle_kind(&self) -> CycleKind {
        self.cycle_kind
    }

    /// Per-level coarsening summaries, level 1 first.
    pub fn reports(&self) -> &[LevelReport] {
        &self.reports
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.store.num_points()
    }

    #[inline]
    pub fn max_level(&self) -> usize {
        self.store.max_level()
    }

    pub fn total_points_at_level(&self, level: usize) -> Result<usize, MeshError> {
        self.store.total_points_at_level(level)
    }

    pub fn mask(&self, level: usize, p: usize) -> Result<bool, MeshError> {
        self.store.mask(level, p)
    }

    pub fn neighbors(&self, p: usize, level: usize) -> Result<&BTreeSet<usize>, MeshError> {
        self.store.neighbors(p, level)
    }

    pub fn active_points(&self, level: usize) -> Result<Vec<usize>, MeshError> {
        self.store.active_points(level)
    }

    /// Points present at `fine` and absent at `coarse`, ascending.
    pub fn difference_points(&self, coarse: usize, fine: usize) -> Result<Vec<usize>, MeshError> {
        self.store.difference_points(coarse, fine)
    }

    pub fn deleted(&self) -> &DeletedPointMap {
        self.store.deleted()
    }

    /// Fresh iterator over the configured cycle.
    pub fn cycle(&self) -> MultigridCycle {
        self.cycle.clone()
    }

    /// CSR export of `level` restricted to its present points.
    pub fn to_csr(&self, level: usize) -> Result<AdjacencyGraph, MeshError> {
        Ok(self
            .store
            .graph(level)?
            .to_csr(self.store.level_mask(level)?))
    }
}

impl<P: PositionProvider> LevelQueries for MultiscaleMesh<P> {
    fn max_level(&self) -> usize {
        self.store.max_level()
    }

    fn total_points_at_level(&self, level: usize) -> Result<usize, MeshError> {
        self.store.total_points_at_level(level)
    }
}

impl<P: PositionProvider> DebugInvariants for MultiscaleMesh<P> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "multiscale mesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.store.validate_invariants()?;
        for level in 0..=self.store.max_level() {
            check_boundary(level, &self.cloud, self.store.level_mask(level)?)?;
        }
        Ok(())
    }
}
