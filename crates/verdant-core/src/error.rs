//! Error types for Verdant client operations.

use thiserror::Error;

/// Core error type for the Verdant client.
///
/// Remote failures keep their two causes apart: [`VerdantError::AuthRejected`]
/// means the backend understood the request and refused the credentials,
/// while [`VerdantError::Network`] and [`VerdantError::Server`] mean the
/// request itself failed. Callers branch on this to decide what to show.
#[derive(Error, Debug, Clone)]
pub enum VerdantError {
    /// The backend rejected the presented credentials.
    #[error("Authentication rejected: {message}")]
    AuthRejected { message: String },

    /// The backend could not be reached (DNS, connect, timeout).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Device-local storage failed to read or write.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Client configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation needs an authenticated session and none exists.
    #[error("No authenticated session")]
    NotAuthenticated,

    /// The session is still restoring from device storage.
    #[error("Session is still restoring")]
    SessionRestoring,

    /// Internal error that should not occur in normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerdantError {
    /// Creates a new authentication rejection with the backend's message.
    pub fn auth_rejected<S: Into<String>>(message: S) -> Self {
        Self::AuthRejected {
            message: message.into(),
        }
    }

    /// Creates a new network error.
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a new storage error.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Creates a new internal error.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a credential rejection.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected { .. })
    }

    /// Returns true if the request never produced a usable response.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns true if the backend answered with a failure status.
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Returns true for any remote failure, rejected credentials included.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::AuthRejected { .. } | Self::Network { .. } | Self::Server { .. }
        )
    }

    /// Returns true if device-local storage failed.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Returns true if the operation required a session that was not there.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }
}

impl From<std::io::Error> for VerdantError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VerdantError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VerdantError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse config: {}", err))
    }
}

impl From<toml::ser::Error> for VerdantError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(format!("Failed to serialize config: {}", err))
    }
}

/// Result type alias for Verdant operations
pub type Result<T> = std::result::Result<T, VerdantError>;
