//! cloudview: load an XYZRGB text file and show it in an interactive window

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use cloudview_core::{ColoredPointCloud3d, Drawable, PointCloudModel};
use cloudview_io::{resolve_input, XyzRgbReader};
use log::{info, warn};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let candidates = cli.candidates();
    let path = match resolve_input(&candidates) {
        Some(path) => path,
        None if cli.strict => {
            anyhow::bail!("none of the input files exist: {}", display_paths(&candidates))
        }
        None => {
            warn!("No input file found among: {}", display_paths(&candidates));
            candidates.first().cloned().unwrap_or_else(|| PathBuf::from(cloudview_io::DEFAULT_INPUT_FILE))
        }
    };

    let cloud = load_cloud(&path, cli)?;
    info!("Loaded {} points from {}", cloud.len(), path.display());

    if cli.no_window {
        let model = PointCloudModel::from_cloud(cloud);
        print_summary(&path, &model);
        return Ok(());
    }

    let config = cli.viewer_config().context("failed to read viewer configuration")?;
    cloudview_visualization::show_point_cloud(cloud, config).context("viewer failed")?;
    Ok(())
}

fn load_cloud(path: &Path, cli: &Cli) -> Result<ColoredPointCloud3d> {
    let options = cli.read_options();
    if !cli.strict {
        return Ok(XyzRgbReader::read_point_cloud_with_options(path, &options));
    }

    let report = XyzRgbReader::load(path, &options)
        .and_then(|report| report.into_non_empty(path))
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(report.cloud)
}

fn print_summary(path: &Path, model: &PointCloudModel) {
    println!("{}: {} points, {} cells", path.display(), model.vertex_count(), model.cell_count());
    if let Some((min, max)) = model.bounding_box() {
        println!(
            "bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
