// Application state module
// Immutable runtime state shared by every connection task

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::ServerError;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical form of `static_files.root_dir`, resolved once at startup
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the served root directory and build the shared state.
    ///
    /// Fails when the root directory is missing or not a directory.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let root_dir = Path::new(&config.static_files.root_dir);
        let root = root_dir
            .canonicalize()
            .map_err(|source| ServerError::RootDir {
                path: config.static_files.root_dir.clone(),
                source,
            })?;

        if !root.is_dir() {
            return Err(ServerError::RootDir {
                path: config.static_files.root_dir.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a directory",
                ),
            });
        }

        Ok(Self { config, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.static_files.root_dir = format!("{}/./", dir.path().display());

        let state = AppState::new(cfg).unwrap();
        assert_eq!(state.root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.static_files.root_dir = dir.path().join("dist").display().to_string();

        assert!(matches!(
            AppState::new(cfg),
            Err(ServerError::RootDir { .. })
        ));
    }

    #[test]
    fn test_file_as_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "hi").unwrap();
        let mut cfg = Config::default();
        cfg.static_files.root_dir = file.display().to_string();

        assert!(AppState::new(cfg).is_err());
    }
}
