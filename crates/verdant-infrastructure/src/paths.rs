//! Unified path management for verdant configuration files.
//!
//! All verdant configuration and device-local state live under one config
//! directory so the CLI and any future desktop shell agree on locations.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/verdant/           # Config directory
//! ├── config.toml              # Client configuration
//! └── storage.json             # Credential slots and locale cache
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for verdant_core::VerdantError {
    fn from(err: PathError) -> Self {
        verdant_core::VerdantError::config(err.to_string())
    }
}

/// Unified path management for verdant.
pub struct VerdantPaths;

impl VerdantPaths {
    /// Returns the verdant configuration directory.
    ///
    /// Resolved via the platform config dir (XDG on Linux, the matching
    /// location on macOS/Windows).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("verdant"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the device storage file.
    ///
    /// # Security Note
    ///
    /// This file holds the bearer token. [`crate::JsonFileStorage`] writes
    /// it with 600 permissions on Unix systems.
    pub fn storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("storage.json"))
    }
}
