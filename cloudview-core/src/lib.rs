//! Core data structures for cloudview
//!
//! This crate provides the colored point record, the ordered point cloud
//! container the loader fills, and the renderable point model handed to the
//! rendering side.

pub mod point;
pub mod point_cloud;
pub mod model;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use model::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
