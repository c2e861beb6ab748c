//! I/O operations for colored point clouds
//!
//! This crate reads the whitespace separated XYZRGB text layout into a
//! [`cloudview_core::ColoredPointCloud3d`] and resolves which input file to
//! open from a list of candidates.

pub mod xyzrgb;
pub mod discovery;
pub mod error;

pub use error::*;
pub use discovery::{resolve_input, DEFAULT_INPUT_FILE};
pub use xyzrgb::{
    ColorNarrowing, LineOutcome, LoadReport, LoadStatus, SkipReason, SkippedLine, XyzRgbReadOptions,
    XyzRgbReader,
};

use cloudview_core::ColoredPointCloud3d;
use std::path::Path;

/// Read a colored point cloud, best effort. Missing files give an empty cloud.
pub fn read_colored_point_cloud<P: AsRef<Path>>(path: P) -> ColoredPointCloud3d {
    XyzRgbReader::read_point_cloud(path)
}
