#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-multiscale
//!
//! mesh-multiscale builds nested hierarchies of progressively coarser
//! neighbor graphs over an unstructured point cloud and moves per-point
//! fields between them, for multigrid-style iterative solves.
//!
//! ## Features
//! - Level-indexed neighbor graphs and presence masks with fail-fast queries
//! - Local coarsening driven by a similarity criterion on a reference field,
//!   with neighborhood re-triangulation through a pluggable local-adjacency
//!   primitive (a Gabriel-graph implementation is built in)
//! - Gaussian RBF interpolation of relative differences and of level
//!   populations from coarse to fine levels
//! - Naive, V and W cycle policies as level iterators
//!
//! ## Determinism
//!
//! Coarsening visits points in ascending id order and neighbor sets are
//! ordered, so rebuilding from identical inputs yields identical hierarchies.
//! Nearest-neighbor ties are broken by id.
//!
//! ## Usage
//!
//! ```rust
//! # fn try_main() -> Result<(), mesh_multiscale::mesh_error::MeshError> {
//! use mesh_multiscale::prelude::*;
//!
//! let positions: Vec<[f64; 3]> = (0..9).map(|i| [i as f64, 0.0, 0.0]).collect();
//! let mut boundary = vec![false; 9];
//! boundary[0] = true;
//! boundary[8] = true;
//! let cloud = PointCloud::try_new(positions, boundary)?;
//! let graph = NeighborGraph::from_edges(9, (1..9).map(|i| (i - 1, i)))?;
//! let abundances = Abundances::uniform(9, 1, 1.0)?;
//! let params = MultigridParams { max_level: 2, tolerance: 0.5, ..Default::default() };
//!
//! let mesh = HierarchyBuilder::new(cloud, graph, GabrielAdjacency::default())
//!     .setup(&abundances, &params)?;
//! assert!(mesh.total_points_at_level(1)? < 9);
//!
//! let transfer = FieldTransfer::new(&mesh, InterpolationOptions::for_dimension(1))?;
//! let mut field = PointField::scalar(vec![1.0; 9]);
//! for visit in mesh.cycle() {
//!     if let Some((source, dest)) = visit.transfer() {
//!         transfer.relative_differences(source, dest, &mut field)?;
//!     }
//! }
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```

pub mod algs;
pub mod data;
pub mod geometry;
pub mod mesh_error;
pub mod multigrid;
pub mod topology;

pub use topology::validation::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::field_transfer::{FieldTransfer, TransferReport};
    pub use crate::algs::interpolate::InterpolationOptions;
    pub use crate::algs::nearest::NearestNeighborIndex;
    pub use crate::data::abundance::{AbundanceProvider, Abundances};
    pub use crate::data::fields::{LevelPopulations, PointField};
    pub use crate::geometry::adjacency::{GabrielAdjacency, LocalAdjacency, LocalNeighbor};
    pub use crate::geometry::positions::{PointCloud, PositionProvider};
    pub use crate::mesh_error::MeshError;
    pub use crate::multigrid::{CycleKind, LevelQueries, MultigridCycle, MultigridParams};
    pub use crate::topology::coarsen::CoarseningOptions;
    pub use crate::topology::hierarchy::{HierarchyBuilder, MultiscaleMesh};
    pub use crate::topology::neighbors::NeighborGraph;
    pub use crate::topology::validation::DebugInvariants;
}
