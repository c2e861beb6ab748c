//! Interactive point cloud viewer window

use std::sync::Arc;

use cloudview_core::{Error, Result};
use cloudview_gpu::PointCloudRenderer;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use crate::config::ViewerConfig;
use crate::controls::TrackballControls;
use crate::scene::Scene;

/// Owns a scene and shows it in a window until the user closes it
pub struct Viewer {
    scene: Scene,
    config: ViewerConfig,
    controls: TrackballControls,
}

impl Viewer {
    pub fn new(scene: Scene, config: ViewerConfig) -> Self {
        Self {
            scene,
            config,
            controls: TrackballControls::new(),
        }
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    pub fn run(mut self) -> Result<()> {
        let event_loop =
            EventLoop::new().map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(self.config.title.clone())
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
                .build(&event_loop)
                .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))?,
        );

        let mut renderer = pollster::block_on(PointCloudRenderer::new(
            window.clone(),
            self.scene.model(),
            self.config.render_config(),
        ))?;

        let size = window.inner_size();
        self.scene.set_viewport(size.width, size.height);
        log::info!(
            "Viewer started: {} points, {}x{} window",
            renderer.instance_count(),
            size.width,
            size.height
        );

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };

                let mut camera_changed = false;
                match event {
                    WindowEvent::CloseRequested => {
                        log::info!("Viewer closed");
                        target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        self.scene.set_viewport(new_size.width, new_size.height);
                        camera_changed = true;
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        self.controls.set_shift(modifiers.state().shift_key());
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        self.controls.mouse_button(button, state == ElementState::Pressed);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let height = renderer.size().height;
                        camera_changed = self.controls.cursor_moved(
                            position.x,
                            position.y,
                            self.scene.camera_mut(),
                            height,
                        );
                    }
                    WindowEvent::CursorLeft { .. } => self.controls.cursor_left(),
                    WindowEvent::MouseWheel { delta, .. } => {
                        let camera = self.scene.camera_mut();
                        camera_changed = match delta {
                            MouseScrollDelta::LineDelta(_, y) => self.controls.scroll_lines(y, camera),
                            MouseScrollDelta::PixelDelta(pos) => self.controls.scroll_pixels(pos.y, camera),
                        };
                    }
                    WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                        match &event.logical_key {
                            Key::Named(NamedKey::Escape) => target.exit(),
                            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                                self.scene.reset_camera();
                                camera_changed = true;
                            }
                            _ => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        renderer.update_camera(self.scene.camera().view_projection_matrix());
                        match renderer.render() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                renderer.resize(renderer.size());
                                window.request_redraw();
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Surface out of memory, closing viewer");
                                target.exit();
                            }
                            Err(e) => log::warn!("Frame skipped: {}", e),
                        }
                    }
                    _ => {}
                }

                if camera_changed {
                    self.scene.refresh_clipping_range();
                    window.request_redraw();
                }
            })
            .map_err(|e| Error::Window(format!("Event loop error: {}", e)))?;

        Ok(())
    }
}
