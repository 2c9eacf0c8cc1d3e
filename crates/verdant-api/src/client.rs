//! Shared HTTP plumbing for the backend clients.

use std::time::Duration;

use serde::Deserialize;
use verdant_core::config::ClientConfig;
use verdant_core::error::{Result, VerdantError};

/// Error body the backend sends with every non-success status.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// Connection shared by the endpoint clients.
///
/// Holds one `reqwest::Client` (and so one connection pool) plus the
/// backend base URL. Endpoint clients clone this cheaply.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client from the loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| VerdantError::internal(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self::new(http, config.backend_url_trimmed()))
    }

    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for an endpoint path starting with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a transport-level failure (connect, timeout, body read) to the
/// core taxonomy. The request never produced a usable response.
pub(crate) fn transport_error(err: reqwest::Error) -> VerdantError {
    VerdantError::network(err.to_string())
}

/// Extracts the backend's `{ "message": ... }` payload, falling back to
/// the raw body when it does not parse, or a placeholder when empty.
fn body_message(body: String) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(&body) {
        return payload.message;
    }
    if body.trim().is_empty() {
        "(no response body)".to_string()
    } else {
        body
    }
}

/// Classifies a non-success status from a general endpoint.
pub(crate) fn status_error(status: u16, body: String) -> VerdantError {
    VerdantError::server(status, body_message(body))
}

/// Classifies a non-success status from a login endpoint.
///
/// Client-side rejections (400-403) become `AuthRejected` so the payload
/// message can be shown verbatim on the login form; anything else is an
/// ordinary server failure.
pub(crate) fn login_status_error(status: u16, body: String) -> VerdantError {
    let message = body_message(body);
    match status {
        400..=403 => VerdantError::auth_rejected(message),
        _ => VerdantError::server(status, message),
    }
}

/// Consumes a failed response into the matching error, using
/// `login_errors` to pick the classification.
pub(crate) async fn response_error(response: reqwest::Response, login_errors: bool) -> VerdantError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => return transport_error(err),
    };
    if login_errors {
        login_status_error(status, body)
    } else {
        status_error(status, body)
    }
}
