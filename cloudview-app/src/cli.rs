use clap::{Parser, ValueEnum};
use cloudview_io::{ColorNarrowing, XyzRgbReadOptions, DEFAULT_INPUT_FILE};
use cloudview_visualization::ViewerConfig;
use std::path::PathBuf;

/// View a colored point cloud stored as `X Y Z R G B` text lines
#[derive(Parser, Debug)]
#[command(name = "cloudview", version, about)]
pub struct Cli {
    /// Point cloud files to try, in order. The first existing one is shown.
    pub paths: Vec<PathBuf>,

    /// Fallback input file, tried after the positional paths
    #[arg(long, env = "CLOUDVIEW_INPUT")]
    pub input: Option<PathBuf>,

    /// Viewer settings as JSON. Flags below override values from the file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Point diameter in pixels [default: 2]
    #[arg(long)]
    pub point_size: Option<f32>,

    /// Background color as R,G,B in 0..1
    #[arg(long, value_parser = parse_rgb)]
    pub background: Option<[f64; 3]>,

    /// Initial camera azimuth in degrees [default: 30]
    #[arg(long, allow_negative_numbers = true)]
    pub azimuth: Option<f32>,

    /// Initial camera elevation in degrees [default: 30]
    #[arg(long, allow_negative_numbers = true)]
    pub elevation: Option<f32>,

    /// What to do with color values outside 0..=255
    #[arg(long, value_enum, default_value_t = ColorPolicy::Clamp)]
    pub color_policy: ColorPolicy,

    /// Treat the first line as data even if it looks like a header
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_header_detection: bool,

    /// Fail if the file is missing or has no valid points
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub strict: bool,

    /// Load and report only, do not open a window
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_window: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorPolicy {
    Clamp,
    Wrap,
    Reject,
}

impl From<ColorPolicy> for ColorNarrowing {
    fn from(policy: ColorPolicy) -> Self {
        match policy {
            ColorPolicy::Clamp => ColorNarrowing::Clamp,
            ColorPolicy::Wrap => ColorNarrowing::Wrap,
            ColorPolicy::Reject => ColorNarrowing::Reject,
        }
    }
}

impl Cli {
    /// Input candidates: positional paths, then `--input`, then the default
    /// file in the working directory
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = self.paths.clone();
        candidates.extend(self.input.clone());
        candidates.push(PathBuf::from(DEFAULT_INPUT_FILE));
        candidates
    }

    pub fn read_options(&self) -> XyzRgbReadOptions {
        XyzRgbReadOptions {
            detect_header: !self.no_header_detection,
            color_narrowing: self.color_policy.into(),
        }
    }

    /// Viewer settings: defaults, then the `--config` file, then flags
    pub fn viewer_config(&self) -> cloudview_core::Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(point_size) = self.point_size {
            config.point_size = point_size;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(azimuth) = self.azimuth {
            config.azimuth_deg = azimuth;
        }
        if let Some(elevation) = self.elevation {
            config.elevation_deg = elevation;
        }
        Ok(config)
    }
}

fn parse_rgb(value: &str) -> Result<[f64; 3], String> {
    let channels = value
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| format!("invalid channel '{}': {}", c, e)))
        .collect::<Result<Vec<_>, _>>()?;

    let [r, g, b] = channels[..] else {
        return Err(format!("expected R,G,B but got {} values", channels.len()));
    };
    for channel in [r, g, b] {
        if !(0.0..=1.0).contains(&channel) {
            return Err(format!("channel {} is outside 0..1", channel));
        }
    }
    Ok([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cloudview").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        let config = cli.viewer_config().unwrap();

        assert_eq!(config, ViewerConfig::default());
        assert_eq!(cli.read_options(), XyzRgbReadOptions::default());
        assert!(!cli.strict);
        assert!(!cli.no_window);
    }

    #[test]
    fn test_candidates_order() {
        let cli = parse(&["a.txt", "b.txt", "--input", "env.txt"]);
        assert_eq!(
            cli.candidates(),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("env.txt"),
                PathBuf::from(DEFAULT_INPUT_FILE),
            ]
        );
    }

    #[test]
    fn test_viewer_flags() {
        let cli = parse(&[
            "--point-size",
            "4",
            "--background",
            "0.1,0.2,0.3",
            "--azimuth",
            "-45",
            "--elevation",
            "10",
        ]);
        let config = cli.viewer_config().unwrap();

        assert_eq!(config.point_size, 4.0);
        assert_eq!(config.background, [0.1, 0.2, 0.3]);
        assert_eq!(config.azimuth_deg, -45.0);
        assert_eq!(config.elevation_deg, 10.0);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{ "point_size": 6.0, "elevation_deg": 60.0, "title": "Site A" }"#).unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "--point-size", "3"]);
        let config = cli.viewer_config().unwrap();

        assert_eq!(config.point_size, 3.0);
        assert_eq!(config.elevation_deg, 60.0);
        assert_eq!(config.title, "Site A");
        assert_eq!(config.azimuth_deg, 30.0);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = parse(&["--config", "/nonexistent/viewer.json"]);
        assert!(cli.viewer_config().is_err());
    }

    #[test]
    fn test_read_option_flags() {
        let cli = parse(&["--color-policy", "wrap", "--no-header-detection"]);
        let options = cli.read_options();

        assert!(!options.detect_header);
        assert_eq!(options.color_narrowing, ColorNarrowing::Wrap);
    }

    #[test]
    fn test_parse_rgb_rejects_bad_input() {
        assert!(parse_rgb("0.1,0.2").is_err());
        assert!(parse_rgb("0.1,0.2,x").is_err());
        assert!(parse_rgb("0.1,0.2,2.0").is_err());
        assert_eq!(parse_rgb(" 1, 0 ,0.5").unwrap(), [1.0, 0.0, 0.5]);
    }
}
