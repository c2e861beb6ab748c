//! Input file discovery
//!
//! The viewer is given an ordered list of candidate paths and opens the
//! first one that exists.

use log::debug;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when nothing else is given
pub const DEFAULT_INPUT_FILE: &str = "world_points_with_color.txt";

/// Return the first candidate that exists on disk
pub fn resolve_input<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate.is_file() {
            debug!("Using point cloud file {}", candidate.display());
            return Some(candidate.to_path_buf());
        }
        debug!("Point cloud file {} not found", candidate.display());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        std::fs::write(&first, "1 2 3 4 5 6\n").unwrap();
        std::fs::write(&second, "1 2 3 4 5 6\n").unwrap();

        let resolved = resolve_input([&missing, &first, &second]);
        assert_eq!(resolved, Some(first));
    }

    #[test]
    fn test_directories_are_not_inputs() {
        let dir = tempdir().unwrap();
        assert_eq!(resolve_input([dir.path()]), None);
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(resolve_input(Vec::<PathBuf>::new()), None);
    }
}
