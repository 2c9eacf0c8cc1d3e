//! Remote backend interfaces.
//!
//! The core never talks HTTP itself. These traits describe what it needs
//! from the Verdant backend; the `verdant-api` crate provides the reqwest
//! implementations, and tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::locale::LanguageTag;
use crate::session::{AuthToken, UserAccount};

/// A freshly issued credential pair, as returned by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: AuthToken,
    pub user: UserAccount,
}

/// Authentication endpoints of the backend.
///
/// Failed logins surface as [`crate::VerdantError::AuthRejected`] carrying
/// the backend's user-visible message; transport and server failures keep
/// their own variants so callers can tell "wrong password" from "no
/// connection".
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchanges an email/password pair for a session.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Exchanges a Google ID token for a session.
    async fn login_with_google(&self, id_token: &str) -> Result<AuthSession>;

    /// Revokes the session on the backend. The local session is the
    /// caller's business; this only invalidates the remote side.
    async fn logout(&self, token: &AuthToken) -> Result<()>;
}

/// Profile and language-preference endpoints of the backend.
#[async_trait]
pub trait ProfileBackend: Send + Sync {
    /// Fetches the current account record for the session.
    async fn account(&self, token: &AuthToken) -> Result<UserAccount>;

    /// Lists the locales the backend can serve.
    async fn available_languages(&self) -> Result<Vec<LanguageTag>>;

    /// Reads the stored language preference of the session's user.
    async fn language_preference(&self, token: &AuthToken) -> Result<LanguageTag>;

    /// Stores `tag` as the language preference of the session's user.
    async fn set_language_preference(&self, token: &AuthToken, tag: &LanguageTag) -> Result<()>;
}
