//! The scene handed to the viewer: one point cloud model and the camera
//! looking at it.
//!
//! The camera works in render space: model coordinates minus
//! [`Scene::origin`], the same shift the renderer applies to the points.

use crate::camera::Camera;
use crate::config::ViewerConfig;
use cloudview_core::{Drawable, Point3d, PointCloudModel};
use cloudview_gpu::render_origin;
use nalgebra::Point3;

/// A point cloud model plus the camera state used to view it
#[derive(Debug, Clone)]
pub struct Scene {
    model: PointCloudModel,
    origin: Point3d,
    camera: Camera,
    home_camera: Camera,
    bounds: Option<(Point3<f32>, Point3<f32>)>,
}

impl Scene {
    /// Build a scene and frame the camera on the model.
    ///
    /// The camera is fit to the model's bounds, then rotated by the configured
    /// azimuth and elevation, then its clipping range is refit. An empty model
    /// keeps the default camera.
    pub fn new(model: PointCloudModel, config: &ViewerConfig) -> Self {
        let origin = render_origin(&model);
        let bounds = model.bounding_box().map(|(min, max)| {
            (
                Point3::from((min - origin).cast::<f32>()),
                Point3::from((max - origin).cast::<f32>()),
            )
        });

        let mut camera = Camera {
            fov: config.view_angle_deg.to_radians(),
            aspect_ratio: config.aspect_ratio(),
            ..Camera::default()
        };

        if let Some((min, max)) = bounds {
            camera.reset_to_bounds(min, max);
            camera.azimuth(config.azimuth_deg);
            camera.elevation(config.elevation_deg);
            camera.orthogonalize_up();
            camera.reset_clipping_range(min, max);
        }

        log::debug!(
            "Scene camera at {:?} looking at {:?}",
            camera.position,
            camera.target
        );

        Self {
            model,
            origin,
            home_camera: camera.clone(),
            camera,
            bounds,
        }
    }

    pub fn model(&self) -> &PointCloudModel {
        &self.model
    }

    /// Model-space point that render space is centered on
    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Restore the initial framing, keeping the current aspect ratio
    pub fn reset_camera(&mut self) {
        let aspect_ratio = self.camera.aspect_ratio;
        self.camera = self.home_camera.clone();
        self.camera.aspect_ratio = aspect_ratio;
    }

    /// Update the aspect ratio for a new viewport size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect_ratio = width as f32 / height as f32;
    }

    /// Refit near and far planes after the camera moved
    pub fn refresh_clipping_range(&mut self) {
        if let Some((min, max)) = self.bounds {
            self.camera.reset_clipping_range(min, max);
        }
    }
}
