//! Viewer configuration
//!
//! Settings can be read from a JSON file. Fields left out of the file keep
//! their default values.

use cloudview_core::{Error, Result};
use cloudview_gpu::RenderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Window, camera and rendering settings for the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Point diameter in pixels
    pub point_size: f32,
    /// Background color as RGB in 0..1
    pub background: [f64; 3],
    /// Initial rotation about view-up after framing, in degrees
    pub azimuth_deg: f32,
    /// Initial tilt after framing, in degrees
    pub elevation_deg: f32,
    /// Vertical field of view, in degrees
    pub view_angle_deg: f32,
    pub enable_depth_test: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Point Cloud Viewer".to_string(),
            width: 1200,
            height: 800,
            point_size: 2.0,
            background: [0.5, 0.5, 0.5],
            azimuth_deg: 30.0,
            elevation_deg: 30.0,
            view_angle_deg: 30.0,
            enable_depth_test: true,
        }
    }
}

impl ViewerConfig {
    /// Read a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::InvalidData(format!("invalid viewer configuration in {}: {}", path.display(), e)))?;
        log::debug!("Read viewer configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidData(format!("invalid viewer configuration: {}", e)))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidData(e.to_string()))
    }

    pub fn render_config(&self) -> RenderConfig {
        let [r, g, b] = self.background;
        RenderConfig {
            point_size: self.point_size.max(1.0),
            background_color: [r, g, b, 1.0],
            enable_depth_test: self.enable_depth_test,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render_config() {
        let config = ViewerConfig::default();
        let render = config.render_config();

        assert_eq!(render.point_size, 2.0);
        assert_eq!(render.background_color, [0.5, 0.5, 0.5, 1.0]);
        assert!(render.enable_depth_test);
    }

    #[test]
    fn test_point_size_floor() {
        let config = ViewerConfig {
            point_size: 0.0,
            ..Default::default()
        };
        assert_eq!(config.render_config().point_size, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json_str(r#"{ "point_size": 5.0, "background": [0.0, 0.0, 0.1] }"#).unwrap();

        assert_eq!(config.point_size, 5.0);
        assert_eq!(config.background, [0.0, 0.0, 0.1]);
        assert_eq!(config.title, "Point Cloud Viewer");
        assert_eq!(config.azimuth_deg, 30.0);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let result = ViewerConfig::from_json_str(r#"{ "point_size": "big" }"#);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        let config = ViewerConfig {
            title: "Survey".to_string(),
            elevation_deg: 45.0,
            ..Default::default()
        };
        fs::write(&path, config.to_json_string().unwrap()).unwrap();

        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
        assert!(matches!(
            ViewerConfig::load(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_aspect_ratio_handles_zero_height() {
        let config = ViewerConfig {
            width: 640,
            height: 0,
            ..Default::default()
        };
        assert_eq!(config.aspect_ratio(), 640.0);
    }
}
