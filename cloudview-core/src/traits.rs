//! Core traits for cloudview

use crate::{model::PointCloudModel, point::*, point_cloud::*};

/// Trait for objects with spatial extent that a camera can be framed on
pub trait Drawable {
    /// Get the axis-aligned bounding box as (min, max), or `None` when there
    /// is nothing to draw
    fn bounding_box(&self) -> Option<(Point3d, Point3d)>;

    /// Get the center point of the object
    fn center(&self) -> Option<Point3d> {
        self.bounding_box().map(|(min, max)| nalgebra::center(&min, &max))
    }

    /// Radius of the sphere enclosing the bounding box
    fn bounding_radius(&self) -> Option<f64> {
        self.bounding_box().map(|(min, max)| (max - min).norm() / 2.0)
    }
}

fn bounds_of<I: IntoIterator<Item = Point3d>>(points: I) -> Option<(Point3d, Point3d)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;

    for p in iter {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);

        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    Some((min, max))
}

impl Drawable for ColoredPointCloud3d {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        bounds_of(self.positions())
    }
}

impl Drawable for PointCloudModel {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        bounds_of(self.vertices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounding_box_of_model() {
        let model = PointCloudModel::new(
            vec![
                Point3d::new(-1.0, 0.0, 2.0),
                Point3d::new(3.0, -4.0, 0.0),
                Point3d::new(0.0, 2.0, 1.0),
            ],
            vec![[0, 0, 0]; 3],
        )
        .unwrap();

        let (min, max) = model.bounding_box().unwrap();
        assert_eq!(min, Point3d::new(-1.0, -4.0, 0.0));
        assert_eq!(max, Point3d::new(3.0, 2.0, 2.0));

        let center = model.center().unwrap();
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, -1.0);
        assert_relative_eq!(center.z, 1.0);
    }

    #[test]
    fn test_empty_has_no_bounds() {
        assert!(PointCloudModel::empty().bounding_box().is_none());
        assert!(ColoredPointCloud3d::new().center().is_none());
    }

    #[test]
    fn test_bounding_radius() {
        let cloud = PointCloud::from_points(vec![
            ColoredPoint3d::new(0.0, 0.0, 0.0, [1, 2, 3]),
            ColoredPoint3d::new(2.0, 0.0, 0.0, [1, 2, 3]),
        ]);
        assert_relative_eq!(cloud.bounding_radius().unwrap(), 1.0);
    }
}
