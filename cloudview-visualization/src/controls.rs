//! Mouse driven trackball controls
//!
//! Left drag rotates, middle or right drag (or shift + left drag) pans, the
//! wheel zooms. Drag distances are in physical pixels.

use crate::camera::Camera;
use winit::event::MouseButton;

/// Degrees of rotation per pixel of drag
pub const ROTATE_DEGREES_PER_PIXEL: f32 = 0.4;

/// Zoom factor applied per wheel line
pub const ZOOM_STEP: f32 = 1.1;

/// Pixels of precise (touchpad) scrolling that count as one wheel line
pub const PIXELS_PER_LINE: f32 = 100.0;

/// What the current drag does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Input state of the trackball interaction
#[derive(Debug, Clone, Default)]
pub struct TrackballControls {
    left_pressed: bool,
    pan_pressed: bool,
    shift_held: bool,
    last_cursor: Option<(f64, f64)>,
}

impl TrackballControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mouse button press or release
    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left_pressed = pressed,
            MouseButton::Middle | MouseButton::Right => self.pan_pressed = pressed,
            _ => {}
        }
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift_held = held;
    }

    /// Current drag mode, if a button is held
    pub fn drag_mode(&self) -> Option<DragMode> {
        if self.pan_pressed || (self.left_pressed && self.shift_held) {
            Some(DragMode::Pan)
        } else if self.left_pressed {
            Some(DragMode::Rotate)
        } else {
            None
        }
    }

    /// Apply a cursor move to the camera. Returns true if the camera changed.
    pub fn cursor_moved(&mut self, x: f64, y: f64, camera: &mut Camera, viewport_height: u32) -> bool {
        let last = self.last_cursor.replace((x, y));
        let (Some((last_x, last_y)), Some(mode)) = (last, self.drag_mode()) else {
            return false;
        };

        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        match mode {
            DragMode::Rotate => {
                // Dragging right spins the scene right, dragging down tilts it
                // towards the viewer
                camera.orbit(-dx * ROTATE_DEGREES_PER_PIXEL, dy * ROTATE_DEGREES_PER_PIXEL);
            }
            DragMode::Pan => {
                let world_per_pixel = camera.view_height_at_target() / viewport_height.max(1) as f32;
                // The scene follows the cursor, so the camera moves the other way
                camera.pan(-dx * world_per_pixel, dy * world_per_pixel);
            }
        }
        true
    }

    /// Apply wheel movement in lines (positive zooms in)
    pub fn scroll_lines(&mut self, lines: f32, camera: &mut Camera) -> bool {
        if lines == 0.0 {
            return false;
        }
        camera.zoom(ZOOM_STEP.powf(lines));
        true
    }

    /// Apply precise scrolling in pixels
    pub fn scroll_pixels(&mut self, pixels: f64, camera: &mut Camera) -> bool {
        self.scroll_lines(pixels as f32 / PIXELS_PER_LINE, camera)
    }

    /// Forget the cursor, e.g. when it leaves the window
    pub fn cursor_left(&mut self) {
        self.last_cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_drag_modes() {
        let mut controls = TrackballControls::new();
        assert_eq!(controls.drag_mode(), None);

        controls.mouse_button(MouseButton::Left, true);
        assert_eq!(controls.drag_mode(), Some(DragMode::Rotate));

        controls.set_shift(true);
        assert_eq!(controls.drag_mode(), Some(DragMode::Pan));

        controls.set_shift(false);
        controls.mouse_button(MouseButton::Left, false);
        controls.mouse_button(MouseButton::Right, true);
        assert_eq!(controls.drag_mode(), Some(DragMode::Pan));
    }

    #[test]
    fn test_move_without_button_does_nothing() {
        let mut controls = TrackballControls::new();
        let mut camera = Camera::default();
        let before = camera.clone();

        assert!(!controls.cursor_moved(10.0, 10.0, &mut camera, 600));
        assert!(!controls.cursor_moved(50.0, 80.0, &mut camera, 600));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_left_drag_orbits_around_target() {
        let mut controls = TrackballControls::new();
        let mut camera = Camera::default();
        controls.cursor_moved(100.0, 100.0, &mut camera, 600);
        controls.mouse_button(MouseButton::Left, true);

        assert!(controls.cursor_moved(150.0, 100.0, &mut camera, 600));
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-5);
        assert_eq!(camera.target, nalgebra::Point3::origin());
        // 50 px right spins the camera 20 degrees to the left
        assert!(camera.position.x < 0.0);
    }

    #[test]
    fn test_pan_drag_follows_cursor_scale() {
        let mut controls = TrackballControls::new();
        let mut camera = Camera::default();
        let world_per_pixel = camera.view_height_at_target() / 600.0;

        controls.cursor_moved(0.0, 0.0, &mut camera, 600);
        controls.mouse_button(MouseButton::Middle, true);
        controls.cursor_moved(10.0, 0.0, &mut camera, 600);

        assert_relative_eq!(camera.target.x, -10.0 * world_per_pixel, epsilon = 1e-6);
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut controls = TrackballControls::new();
        let mut camera = Camera::default();

        assert!(controls.scroll_lines(1.0, &mut camera));
        assert_relative_eq!(camera.distance(), 1.0 / ZOOM_STEP, epsilon = 1e-5);

        assert!(controls.scroll_pixels(-100.0, &mut camera));
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-5);

        assert!(!controls.scroll_lines(0.0, &mut camera));
    }
}
