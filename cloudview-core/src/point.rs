//! Point types and related functionality

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// One sample of a colored point cloud: a double precision position and an
/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint3d {
    pub position: Point3d,
    pub color: [u8; 3],
}

impl ColoredPoint3d {
    /// Create a colored point from coordinates and channels
    pub fn new(x: f64, y: f64, z: f64, color: [u8; 3]) -> Self {
        Self {
            position: Point3d::new(x, y, z),
            color,
        }
    }
}
