//! Ordered point cloud container

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered point cloud. Insertion order is preserved, so a cloud filled
/// by a reader keeps the order of the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A point cloud of colored double precision points
pub type ColoredPointCloud3d = PointCloud<ColoredPoint3d>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point at the end of the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }
}

impl PointCloud<ColoredPoint3d> {
    /// Iterate over the positions in cloud order
    pub fn positions(&self) -> impl Iterator<Item = Point3d> + '_ {
        self.iter().map(|p| p.position)
    }

    /// Iterate over the colors in cloud order
    pub fn colors(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.iter().map(|p| p.color)
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut cloud = ColoredPointCloud3d::new();
        cloud.push(ColoredPoint3d::new(1.0, 2.0, 3.0, [255, 0, 0]));
        cloud.push(ColoredPoint3d::new(4.0, 5.0, 6.0, [0, 128, 0]));

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0].position, Point3d::new(1.0, 2.0, 3.0));
        assert_eq!(cloud[1].color, [0, 128, 0]);

        let colors: Vec<_> = cloud.colors().collect();
        assert_eq!(colors, vec![[255, 0, 0], [0, 128, 0]]);
    }

    #[test]
    fn test_positions_follow_insertion_order() {
        let cloud = PointCloud::from_points(vec![
            ColoredPoint3d::new(3.0, 0.0, 0.0, [0, 0, 0]),
            ColoredPoint3d::new(1.0, 0.0, 0.0, [0, 0, 0]),
        ]);

        let xs: Vec<f64> = cloud.positions().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 1.0]);
        assert_eq!(cloud.iter().count(), 2);
    }

    #[test]
    fn test_empty_cloud() {
        let cloud = ColoredPointCloud3d::default();
        assert!(cloud.is_empty());
        assert_eq!(cloud.positions().count(), 0);
    }
}
