//! # cloudview GPU
//!
//! wgpu rendering for colored point clouds.
//!
//! The renderer takes a [`cloudview_core::PointCloudModel`], uploads one
//! instance per vertex and draws each as a screen-aligned sprite colored
//! directly from the model's color attribute.

pub mod device;
pub mod renderer;

// Re-export commonly used items
pub use device::GpuContext;
pub use renderer::{
    instance_batches, model_to_vertices, render_origin, CameraUniform, PointCloudRenderer, PointVertex, RenderConfig,
};
