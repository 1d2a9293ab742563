//! Re-export public algorithms.

pub mod adjacency_graph;
pub mod field_transfer;
pub mod interpolate;
pub mod nearest;

pub use adjacency_graph::AdjacencyGraph;
pub use field_transfer::{FieldTransfer, TransferReport};
pub use interpolate::{InterpolationOptions, RbfStencil, gaussian};
pub use nearest::NearestNeighborIndex;
