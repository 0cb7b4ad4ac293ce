//! Unified path management for EduAssist files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/eduassist/         # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/eduassist/    # Data directory
//! └── session.json             # Session store (tokens, transcripts)
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "eduassist";

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves file locations, optionally rooted at a custom base directory
/// (used by tests and the `--data-dir` flag).
#[derive(Debug, Clone, Default)]
pub struct EduPaths {
    base: Option<PathBuf>,
}

impl EduPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_base_directory() {
        let paths = EduPaths::new(Some(Path::new("/tmp/edu")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/edu/config.toml"));
        assert_eq!(paths.session_file().unwrap(), PathBuf::from("/tmp/edu/session.json"));
    }
}
