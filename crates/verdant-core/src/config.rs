//! Client configuration model.

use serde::{Deserialize, Serialize};

/// Default backend the client talks to when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://api.verdant.garden";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings loaded from the client's `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Verdant backend, without a trailing slash.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Timeout applied to every remote request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Base URL with any trailing slash removed, so endpoint paths can be
    /// appended uniformly.
    pub fn backend_url_trimmed(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}
