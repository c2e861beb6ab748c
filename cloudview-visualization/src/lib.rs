//! Interactive visualization of colored point clouds
//!
//! - [`Scene`]: a model plus a camera framed on it
//! - [`Viewer`]: winit window and event loop drawing the scene
//! - [`TrackballControls`]: mouse rotate, pan and zoom

pub mod camera;
pub mod config;
pub mod controls;
pub mod scene;
pub mod viewer;

pub use camera::*;
pub use config::*;
pub use controls::*;
pub use scene::*;
pub use viewer::*;

use cloudview_core::{ColoredPointCloud3d, PointCloudModel, Result};

/// Build the display model for `cloud` and show it in an interactive window
pub fn show_point_cloud(cloud: ColoredPointCloud3d, config: ViewerConfig) -> Result<()> {
    let model = PointCloudModel::from_cloud(cloud);
    let scene = Scene::new(model, &config);
    Viewer::new(scene, config).run()
}
