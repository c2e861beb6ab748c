//! Trackball camera for 3D visualization

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Unit, Vector3};

/// Converts OpenGL clip space depth (-1..1) to the 0..1 range wgpu expects
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Closest the camera may dolly towards its target
const MIN_DISTANCE: f32 = 1e-4;

/// A camera orbiting a focal point (`target`)
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix, in wgpu clip space
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        opengl_to_wgpu_matrix() * perspective.into_inner()
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance between the camera and its target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Unit vector from the camera towards the target
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Unit vector pointing to the right of the view
    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(&self.up).normalize()
    }

    /// Rotate the camera about the view-up vector, centered on the target
    pub fn azimuth(&mut self, degrees: f32) {
        let Some(axis) = Unit::try_new(self.up, f32::EPSILON) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.position = self.target + rotation * (self.position - self.target);
    }

    /// Rotate the camera up (positive) or down around the target, about the
    /// axis to the right of the view
    pub fn elevation(&mut self, degrees: f32) {
        let offset = self.position - self.target;
        let Some(axis) = Unit::try_new(offset.cross(&self.up), f32::EPSILON) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.position = self.target + rotation * offset;
        self.orthogonalize_up();
    }

    /// Trackball rotation: horizontal drag spins around view-up, vertical
    /// drag tilts
    pub fn orbit(&mut self, horizontal_degrees: f32, vertical_degrees: f32) {
        self.azimuth(horizontal_degrees);
        self.elevation(vertical_degrees);
    }

    /// Translate camera and target together along the view plane
    pub fn pan(&mut self, right: f32, up: f32) {
        let translation = self.right() * right + self.up.normalize() * up;
        self.position += translation;
        self.target += translation;
    }

    /// Move towards the target by `factor` (greater than one moves closer)
    pub fn zoom(&mut self, factor: f32) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let distance = (self.distance() / factor).max(MIN_DISTANCE);
        self.position = self.target - self.forward() * distance;
    }

    /// World-space height of the view plane through the target
    pub fn view_height_at_target(&self) -> f32 {
        2.0 * self.distance() * (self.fov / 2.0).tan()
    }

    /// Point the camera at the center of a bounding box and back off until
    /// the box's bounding sphere fills the view. The view direction is kept.
    pub fn reset_to_bounds(&mut self, min: Point3<f32>, max: Point3<f32>) {
        let center = nalgebra::center(&min, &max);
        let mut radius = (max - min).norm() / 2.0;
        if radius <= f32::EPSILON {
            radius = 0.5;
        }

        let back = -self.forward();
        let distance = radius / (self.fov / 2.0).sin();

        self.target = center;
        self.position = center + back * distance;
        self.orthogonalize_up();
        self.reset_clipping_range(min, max);
    }

    /// Fit near and far planes tightly around a bounding box
    pub fn reset_clipping_range(&mut self, min: Point3<f32>, max: Point3<f32>) {
        let center = nalgebra::center(&min, &max);
        let radius = ((max - min).norm() / 2.0).max(f32::EPSILON);
        let depth = (center - self.position).dot(&self.forward());

        let far = (depth + radius) * 1.01;
        let near = (depth - radius) * 0.99;
        // Keep some depth precision when the camera sits inside the box
        self.near = near.max(far * 1e-3).max(MIN_DISTANCE);
        self.far = far.max(self.near * 2.0);
    }

    /// Make `up` perpendicular to the view direction
    pub fn orthogonalize_up(&mut self) {
        let forward = self.forward();
        let right = forward.cross(&self.up);
        if let Some(right) = Unit::try_new(right, f32::EPSILON) {
            self.up = right.cross(&forward).normalize();
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            30f32.to_radians(),
            16.0 / 9.0,
            0.01,
            1000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_azimuth_rotates_about_up() {
        let mut camera = Camera::default();
        camera.azimuth(90.0);

        assert_relative_eq!(camera.position.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_elevation_raises_camera_and_keeps_up_orthogonal() {
        let mut camera = Camera::default();
        camera.elevation(30.0);

        assert_relative_eq!(camera.position.y, 0.5, epsilon = 1e-5);
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.up.dot(&camera.forward()), 0.0, epsilon = 1e-5);
        assert!(camera.up.y > 0.0);
    }

    #[test]
    fn test_pan_moves_target_with_camera() {
        let mut camera = Camera::default();
        camera.pan(2.0, -1.0);

        assert_relative_eq!(camera.target.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(camera.target.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_scales_distance() {
        let mut camera = Camera::default();
        camera.zoom(2.0);
        assert_relative_eq!(camera.distance(), 0.5, epsilon = 1e-5);

        camera.zoom(0.25);
        assert_relative_eq!(camera.distance(), 2.0, epsilon = 1e-5);

        camera.zoom(0.0);
        assert_relative_eq!(camera.distance(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_reset_to_bounds_fits_sphere() {
        let mut camera = Camera::default();
        camera.reset_to_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));

        let expected = 3f32.sqrt() / 15f32.to_radians().sin();
        assert_eq!(camera.target, Point3::origin());
        assert_relative_eq!(camera.distance(), expected, epsilon = 1e-4);
        assert_relative_eq!(camera.position.z, expected, epsilon = 1e-4);
        assert!(camera.near > 0.0);
        assert!(camera.near < expected - 3f32.sqrt());
        assert!(camera.far > expected + 3f32.sqrt());
    }

    #[test]
    fn test_reset_to_single_point() {
        let mut camera = Camera::default();
        let p = Point3::new(5.0, 5.0, 5.0);
        camera.reset_to_bounds(p, p);

        assert_eq!(camera.target, p);
        assert!(camera.distance() > 0.0);
        assert!(camera.near < camera.far);
    }

    #[test]
    fn test_projection_maps_near_plane_to_zero_depth() {
        let camera = Camera::default();
        let near_point = nalgebra::Point3::new(0.0, 0.0, -camera.near);
        let clip = camera.projection_matrix() * near_point.to_homogeneous();
        assert_relative_eq!(clip.z / clip.w, 0.0, epsilon = 1e-4);
    }
}
