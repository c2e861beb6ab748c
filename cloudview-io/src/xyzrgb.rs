//! XYZRGB text point cloud format support
//!
//! One point per line, six space separated numbers: `x y z r g b`. The color
//! channels are written as floating point numbers but describe 0-255
//! intensities. An optional first line naming the columns (`X Y Z R G B`)
//! is skipped.
//!
//! Loading is best effort: blank lines are ignored and malformed lines are
//! dropped without aborting the rest of the file.

use cloudview_core::{ColoredPoint3d, ColoredPointCloud3d};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::IoError;

/// Number of columns on a data line
pub const COLUMN_COUNT: usize = 6;

/// Columns of a data line, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    X,
    Y,
    Z,
    Red,
    Green,
    Blue,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::X,
        Column::Y,
        Column::Z,
        Column::Red,
        Column::Green,
        Column::Blue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::X => "x",
            Column::Y => "y",
            Column::Z => "z",
            Column::Red => "r",
            Column::Green => "g",
            Column::Blue => "b",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a truncated color value outside `0..=255` becomes an 8-bit channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorNarrowing {
    /// Saturate to the nearest bound
    #[default]
    Clamp,
    /// Keep the low 8 bits, the way a narrowing integer cast does
    Wrap,
    /// Drop the whole line
    Reject,
}

impl ColorNarrowing {
    /// Truncate `value` toward zero and narrow it to a channel value.
    ///
    /// Returns `None` only for [`ColorNarrowing::Reject`] when the truncated
    /// value is out of range.
    pub fn narrow(&self, value: f64) -> Option<u8> {
        let truncated = value.trunc();
        match self {
            ColorNarrowing::Clamp => Some(truncated.clamp(0.0, 255.0) as u8),
            ColorNarrowing::Wrap => Some((truncated as i64).rem_euclid(256) as u8),
            ColorNarrowing::Reject => {
                if (0.0..=255.0).contains(&truncated) {
                    Some(truncated as u8)
                } else {
                    None
                }
            }
        }
    }
}

/// Options for reading XYZRGB files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XyzRgbReadOptions {
    /// Skip the first non-empty line when it looks like a column header
    pub detect_header: bool,
    pub color_narrowing: ColorNarrowing,
}

impl Default for XyzRgbReadOptions {
    fn default() -> Self {
        Self {
            detect_header: true,
            color_narrowing: ColorNarrowing::Clamp,
        }
    }
}

/// Why a line was left out of the cloud
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The line did not split into exactly six tokens
    TokenCount { found: usize },
    /// A token is not a finite number
    InvalidNumber { column: Column, token: String },
    /// A color channel is out of range under [`ColorNarrowing::Reject`]
    ColorOutOfRange { column: Column, value: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TokenCount { found } => {
                write!(f, "expected {} values, found {}", COLUMN_COUNT, found)
            }
            SkipReason::InvalidNumber { column, token } => {
                write!(f, "invalid number {:?} in column {}", token, column)
            }
            SkipReason::ColorOutOfRange { column, value } => {
                write!(f, "color value {} in column {} is outside 0-255", value, column)
            }
        }
    }
}

/// A dropped line and the reason it was dropped
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the source
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Result of parsing one non-empty data line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Point(ColoredPoint3d),
    Skipped(SkipReason),
}

/// Overall shape of a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No valid points were found
    Empty,
    /// Every data line produced a point
    Complete,
    /// Some points were loaded and some lines were dropped
    Partial { skipped: usize },
}

/// Everything a load produced: the cloud plus an account of what was dropped
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub cloud: ColoredPointCloud3d,
    /// The header line, if one was detected and skipped
    pub header: Option<String>,
    pub skipped: Vec<SkippedLine>,
    /// Total lines seen, blank ones included
    pub lines_read: usize,
}

impl LoadReport {
    /// Number of points successfully parsed
    pub fn point_count(&self) -> usize {
        self.cloud.len()
    }

    pub fn status(&self) -> LoadStatus {
        if self.cloud.is_empty() {
            LoadStatus::Empty
        } else if self.skipped.is_empty() {
            LoadStatus::Complete
        } else {
            LoadStatus::Partial {
                skipped: self.skipped.len(),
            }
        }
    }

    /// Fail with [`IoError::NoValidPoints`] if nothing was loaded
    pub fn into_non_empty<P: AsRef<Path>>(self, path: P) -> Result<Self, IoError> {
        if self.cloud.is_empty() {
            return Err(IoError::NoValidPoints {
                path: path.as_ref().display().to_string(),
            });
        }
        Ok(self)
    }
}

/// Check whether a line is a column header (`X Y Z R G B` and friends)
pub fn is_header_line(line: &str) -> bool {
    line.contains('X') && line.contains('Y') && line.contains('Z')
}

/// XYZRGB reader implementation
pub struct XyzRgbReader;

impl XyzRgbReader {
    /// Read a colored point cloud, best effort, with default options.
    ///
    /// A file that cannot be opened yields an empty cloud; the failure is
    /// only logged.
    pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> ColoredPointCloud3d {
        Self::read_point_cloud_with_options(path, &XyzRgbReadOptions::default())
    }

    /// Read a colored point cloud, best effort, with specific options
    pub fn read_point_cloud_with_options<P: AsRef<Path>>(
        path: P,
        options: &XyzRgbReadOptions,
    ) -> ColoredPointCloud3d {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Cannot open point cloud file {}: {}", path.display(), e);
                return ColoredPointCloud3d::new();
            }
        };

        let mut report = LoadReport::default();
        if let Err(e) = Self::scan(BufReader::new(file), options, &mut report) {
            warn!(
                "Stopped reading {} at line {}: {}",
                path.display(),
                report.lines_read + 1,
                e
            );
        }
        Self::log_summary(&report, path);

        report.cloud
    }

    /// Load a colored point cloud and report what was skipped.
    ///
    /// Unlike [`XyzRgbReader::read_point_cloud`] a missing or unreadable
    /// file is an error. Malformed lines are still skipped.
    pub fn load<P: AsRef<Path>>(path: P, options: &XyzRgbReadOptions) -> Result<LoadReport, IoError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;

        let report = Self::read_from(BufReader::new(file), options)?;
        Self::log_summary(&report, path);
        Ok(report)
    }

    /// Parse XYZRGB data from any buffered source
    pub fn read_from<R: BufRead>(reader: R, options: &XyzRgbReadOptions) -> Result<LoadReport, IoError> {
        let mut report = LoadReport::default();
        Self::scan(reader, options, &mut report)?;
        Ok(report)
    }

    /// Parse a single trimmed, non-empty data line
    pub fn parse_line(line: &str, options: &XyzRgbReadOptions) -> LineOutcome {
        let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.len() != COLUMN_COUNT {
            return LineOutcome::Skipped(SkipReason::TokenCount {
                found: tokens.len(),
            });
        }

        let mut values = [0.0f64; COLUMN_COUNT];
        for ((value, token), column) in values.iter_mut().zip(&tokens).zip(Column::ALL) {
            match token.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => *value = v,
                _ => {
                    return LineOutcome::Skipped(SkipReason::InvalidNumber {
                        column,
                        token: token.to_string(),
                    })
                }
            }
        }

        let mut color = [0u8; 3];
        for (i, channel) in color.iter_mut().enumerate() {
            let value = values[3 + i];
            match options.color_narrowing.narrow(value) {
                Some(c) => *channel = c,
                None => {
                    return LineOutcome::Skipped(SkipReason::ColorOutOfRange {
                        column: Column::ALL[3 + i],
                        value,
                    })
                }
            }
        }

        LineOutcome::Point(ColoredPoint3d::new(values[0], values[1], values[2], color))
    }

    /// Walk the lines of `reader`, filling `report` as it goes so a read
    /// error leaves the points parsed so far in place.
    ///
    /// Bytes that are not valid UTF-8 decode to U+FFFD, so such a line fails
    /// to parse and is skipped like any other malformed line.
    fn scan<R: BufRead>(mut reader: R, options: &XyzRgbReadOptions, report: &mut LoadReport) -> io::Result<()> {
        let mut seen_content = false;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            report.lines_read += 1;
            let line_number = report.lines_read;

            let raw = String::from_utf8_lossy(&buf);
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let first_content = !seen_content;
            seen_content = true;
            if first_content && options.detect_header && is_header_line(line) {
                debug!("Skipping header line: {}", line);
                report.header = Some(line.to_string());
                continue;
            }

            match Self::parse_line(line, options) {
                LineOutcome::Point(point) => report.cloud.push(point),
                LineOutcome::Skipped(reason) => {
                    debug!("Skipping line {} ({}): {}", line_number, reason, line);
                    report.skipped.push(SkippedLine {
                        line_number,
                        reason,
                    });
                }
            }
        }

        Ok(())
    }

    fn log_summary(report: &LoadReport, path: &Path) {
        info!(
            "Loaded {} colored points from {}",
            report.point_count(),
            path.display()
        );
        if !report.skipped.is_empty() {
            warn!(
                "Skipped {} malformed lines in {}",
                report.skipped.len(),
                path.display()
            );
        }
    }
}
