//! Session domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability tier attached to a user account.
///
/// The wire format is the bare variant name (`"Regular"`, `"Premium"`),
/// matching what the backend stores on the account record. Unknown tiers
/// fail deserialization, which downstream treats as corrupt data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Regular,
    Premium,
}

impl Role {
    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "Regular",
            Role::Premium => "Premium",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account record mirrored from the backend.
///
/// Only `id` and `role` are required; older persisted records may predate
/// the profile fields, so those default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserAccount {
    /// Name to show in UI output, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Opaque bearer credential issued by the backend on login.
///
/// The raw value is never printed: `Debug` is redacted so tokens cannot
/// leak through logs or panic messages.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self(raw.into())
    }

    /// Raw token value, for building `Authorization` headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<redacted>)")
    }
}

/// Lifecycle of the client session.
///
/// `Authenticated` carries the token and the user together, so no reader
/// can ever observe one without the other. The session starts in `Loading`
/// and leaves it exactly once, when the startup restore finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup restore from device storage has not finished yet.
    Loading,
    /// A user is signed in.
    Authenticated { token: AuthToken, user: UserAccount },
    /// Nobody is signed in.
    Unauthenticated,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&UserAccount> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// The session token, if any.
    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}
