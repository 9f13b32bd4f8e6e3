//! Well-known output locations, relative to the working directory.
//!
//! - `downloads/` — archives saved by the download mode
//! - `results/` — CSV files written by the file output mode
//! - `logs/` — rolling log files

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Returns the downloads directory path in the current working directory
pub fn downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

/// Returns the results directory path in the current working directory
pub fn results_dir() -> PathBuf {
    PathBuf::from("results")
}

/// Returns the log directory path in the current working directory
pub fn logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Create `path` (and any missing parents) if it does not exist yet.
///
/// A permission failure here is fatal for the whole run.
pub fn ensure_dir(path: &Path) -> Result<(), PathError> {
    std::fs::create_dir_all(path).map_err(|source| PathError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_dirs_are_relative() {
        assert!(downloads_dir().is_relative());
        assert!(results_dir().is_relative());
        assert!(logs_dir().is_relative());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Existing directory is fine
        ensure_dir(&nested).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_permission_failure() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let locked = tmp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o400)).unwrap();

        let result = ensure_dir(&locked.join("child"));
        // Root can bypass permission checks, so only assert when it failed
        if let Err(PathError::CreateDir { path, .. }) = result {
            assert_eq!(path, locked.join("child"));
        }

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o700)).unwrap();
    }
}
