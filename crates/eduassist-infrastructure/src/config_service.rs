//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` and applies the
//! `EDUASSIST_API_BASE_URL` override.

use crate::paths::EduPaths;
use eduassist_core::config::{API_BASE_URL_ENV, ClientConfig};
use eduassist_core::{EduError, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &EduPaths) -> Self {
        let path = paths
            .config_file()
            .map_err(|e| tracing::warn!("[ConfigService] {}; using defaults", e))
            .ok();
        Self::with_path(path)
    }

    pub fn with_path(path: Option<PathBuf>) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self.config.read().ok().and_then(|guard| guard.clone()) {
            return Ok(cached);
        }

        let loaded = self
            .load_file()?
            .with_override(std::env::var(API_BASE_URL_ENV).ok());
        tracing::debug!("[ConfigService] api_base_url = {}", loaded.api_base_url);

        if let Ok(mut guard) = self.config.write() {
            *guard = Some(loaded.clone());
        }
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.config.write() {
            *guard = None;
        }
    }

    /// Writes `config` to the config file, creating parent directories.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| EduError::config("no config file location available"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(config)?)?;
        self.invalidate_cache();
        Ok(())
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let Some(path) = &self.path else {
            return Ok(ClientConfig::default());
        };
        if !path.exists() {
            return Ok(ClientConfig::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }
        toml::from_str(&content)
            .map_err(|e| EduError::config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(Some(dir.path().join("config.toml")));
        let config = service.load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(Some(dir.path().join("nested/config.toml")));
        service
            .save(&ClientConfig::new("https://edu.example.org"))
            .unwrap();
        assert_eq!(
            service.load_file().unwrap().api_base_url,
            "https://edu.example.org"
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = [").unwrap();
        let service = ConfigService::with_path(Some(path));
        assert!(matches!(service.load_file(), Err(EduError::Config(_))));
    }
}
