//! Configuration service implementation.
//!
//! Loads the client configuration from `~/.config/verdant/config.toml`,
//! writing a default template on first run.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use verdant_core::config::ClientConfig;
use verdant_core::error::Result;

use crate::paths::VerdantPaths;

/// Environment variable overriding the configured backend URL.
pub const BACKEND_URL_ENV: &str = "VERDANT_BACKEND_URL";

/// Loads and caches the client configuration.
///
/// The file is read once and cached to avoid repeated I/O; call
/// [`ConfigService::invalidate_cache`] after editing the file externally.
#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, lazily loaded on first access.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Service over the default config location.
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(VerdantPaths::config_file()?))
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file is created with defaults so users have a template to
    /// edit. `VERDANT_BACKEND_URL` overrides the configured backend URL,
    /// which keeps pointing a dev build at a local backend a one-liner.
    pub fn get(&self) -> Result<ClientConfig> {
        self.get_with_override(std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Same as [`ConfigService::get`], with the backend-URL override passed
    /// explicitly instead of read from the environment. A blank override is
    /// ignored. The cache holds the file contents; the override sits on top
    /// of it per call.
    pub fn get_with_override(&self, backend_url: Option<String>) -> Result<ClientConfig> {
        let mut config = self.cached_or_load()?;
        if let Some(url) = backend_url {
            if !url.trim().is_empty() {
                config.backend_url = url;
            }
        }
        Ok(config)
    }

    fn cached_or_load(&self) -> Result<ClientConfig> {
        {
            let cached = self.config.read().unwrap();
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_or_create()?;
        let mut cached = self.config.write().unwrap();
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap();
        *cached = None;
    }

    fn load_or_create(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            let default = ClientConfig::default();
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, toml::to_string_pretty(&default)?)?;
            tracing::info!(path = %self.path.display(), "Wrote default configuration");
            return Ok(default);
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use verdant_core::config::DEFAULT_BACKEND_URL;

    #[test]
    fn first_run_writes_a_default_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let service = ConfigService::new(path.clone());

        let config = service.get().unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert!(path.exists());

        // The template itself parses back to the same config.
        let reread: ClientConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn existing_file_is_loaded_and_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend_url = \"http://localhost:3000\"\n").unwrap();

        let service = ConfigService::new(path.clone());
        assert_eq!(service.get().unwrap().backend_url, "http://localhost:3000");

        // Cache serves subsequent reads until invalidated.
        fs::write(&path, "backend_url = \"http://other:3000\"\n").unwrap();
        assert_eq!(service.get().unwrap().backend_url, "http://localhost:3000");
        service.invalidate_cache();
        assert_eq!(service.get().unwrap().backend_url, "http://other:3000");
    }

    #[test]
    fn backend_url_override_wins_over_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend_url = \"http://localhost:3000\"\n").unwrap();
        let service = ConfigService::new(path);

        let config = service
            .get_with_override(Some("http://dev-box:9000".to_string()))
            .unwrap();
        assert_eq!(config.backend_url, "http://dev-box:9000");

        // Blank overrides are ignored, and the file value stays intact
        // for calls without one.
        let blank = service.get_with_override(Some("  ".to_string())).unwrap();
        assert_eq!(blank.backend_url, "http://localhost:3000");
        let plain = service.get_with_override(None).unwrap();
        assert_eq!(plain.backend_url, "http://localhost:3000");
    }

    #[test]
    fn broken_config_surfaces_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend_url = [not toml").unwrap();

        let err = ConfigService::new(path).get().unwrap_err();
        assert!(matches!(err, verdant_core::VerdantError::Config(_)));
    }
}
