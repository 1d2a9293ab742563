//! Level hierarchy topology.
//!
//! This module holds the per-level structures and the algorithms that build
//! them:
//! - [`NeighborGraph`] and [`LevelMask`] for one level
//! - [`Multiscale`], the level-indexed store, and [`DeletedPointMap`]
//! - [`CoarseningEngine`] for local coarsening and re-triangulation
//! - [`HierarchyBuilder`] / [`MultiscaleMesh`] for the full hierarchy
//!
//! Most users build a [`MultiscaleMesh`] and query it by level.

pub mod coarsen;
pub mod deleted;
pub mod hierarchy;
pub mod mask;
pub mod multiscale;
pub mod neighbors;
pub mod validation;

pub use coarsen::{CoarseningEngine, CoarseningOptions, LevelReport, RemeshReport, similarity};
pub use deleted::DeletedPointMap;
pub use hierarchy::{HierarchyBuilder, MultiscaleMesh};
pub use mask::LevelMask;
pub use multiscale::{LevelMut, Multiscale};
pub use neighbors::NeighborGraph;
pub use validation::DebugInvariants;
