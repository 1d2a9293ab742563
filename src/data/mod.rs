//! Data module: abundances and per-point fields

pub mod abundance;
pub mod fields;

pub use abundance::{AbundanceProvider, Abundances};
pub use fields::{LevelPopulations, PointField};
