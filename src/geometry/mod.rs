//! Geometry for mesh-multiscale.
//!
//! Frozen point positions, bounding boxes used to confine local remeshing,
//! and the local-adjacency primitive that re-triangulates a neighborhood.

pub mod adjacency;
pub mod bounds;
pub mod positions;

pub use adjacency::{BoxWall, GabrielAdjacency, LocalAdjacency, LocalNeighbor, LocalPoint};
pub use bounds::BoundingBox;
pub use positions::{PointCloud, PositionProvider};
