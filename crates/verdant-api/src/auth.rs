//! Authentication endpoint client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use verdant_core::backend::{AuthBackend, AuthSession};
use verdant_core::error::Result;
use verdant_core::session::{AuthToken, UserAccount};

use crate::client::{ApiClient, response_error, transport_error};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct GoogleLoginRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: AuthToken,
    user: UserAccount,
}

/// Talks to the backend's `/api/auth` endpoints.
#[derive(Clone)]
pub struct AuthApiClient {
    api: ApiClient,
}

impl AuthApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn post_login<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthSession> {
        let response = self
            .api
            .http()
            .post(self.api.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response, true).await);
        }

        let payload: LoginResponse = response.json().await.map_err(transport_error)?;
        tracing::debug!(user_id = payload.user.id, "Login accepted by backend");
        Ok(AuthSession {
            token: payload.token,
            user: payload.user,
        })
    }
}

#[async_trait]
impl AuthBackend for AuthApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.post_login("/api/auth/login", &LoginRequest { email, password })
            .await
    }

    async fn login_with_google(&self, id_token: &str) -> Result<AuthSession> {
        self.post_login("/api/auth/google", &GoogleLoginRequest { id_token })
            .await
    }

    async fn logout(&self, token: &AuthToken) -> Result<()> {
        let response = self
            .api
            .http()
            .post(self.api.url("/api/auth/logout"))
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response, false).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_core::session::Role;

    #[test]
    fn login_response_parses_backend_shape() {
        let payload: LoginResponse = serde_json::from_str(
            r#"{"token":"t-1","user":{"id":3,"role":"Premium","name":"Ivy","email":"ivy@example.com"}}"#,
        )
        .unwrap();
        assert_eq!(payload.token.as_str(), "t-1");
        assert_eq!(payload.user.role, Role::Premium);
    }

    #[test]
    fn login_request_serializes_expected_fields() {
        let body = serde_json::to_value(LoginRequest {
            email: "ivy@example.com",
            password: "hunter2",
        })
        .unwrap();
        assert_eq!(body["email"], "ivy@example.com");
        assert_eq!(body["password"], "hunter2");
    }
}
