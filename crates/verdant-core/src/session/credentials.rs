//! Credential persistence over device-local storage.

use std::sync::Arc;

use crate::error::Result;
use crate::storage::KeyValueStorage;

use super::model::{AuthToken, UserAccount};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key holding the signed-in user record as a JSON string.
pub const USER_KEY: &str = "auth_user";

/// Outcome of reading persisted credentials.
///
/// `Corrupt` is deliberate: persisted data that cannot be parsed is an
/// ordinary outcome, not an error. Callers treat it exactly like `Missing`
/// (nobody is signed in) so a damaged device file can never wedge startup.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialLoad {
    /// Both slots present and parseable.
    Found { token: AuthToken, user: UserAccount },
    /// One or both slots absent.
    Missing,
    /// Slots present but unreadable.
    Corrupt,
}

/// Persists the token/user pair through device-local storage.
///
/// The two slots always change together: `save` and `clear` go through the
/// storage batch operations so a crash cannot leave a token without its
/// user record or the other way round.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Writes both credential slots in one batch.
    ///
    /// Storage failures propagate; a session must never look signed in
    /// while nothing was persisted.
    pub async fn save(&self, token: &AuthToken, user: &UserAccount) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage
            .set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, &user_json)])
            .await
    }

    /// Reads both slots back and classifies the result.
    ///
    /// I/O failures propagate. Parse failures do not: they land on
    /// [`CredentialLoad::Corrupt`] with a warning, since old or damaged
    /// records must degrade to a signed-out session.
    pub async fn load(&self) -> Result<CredentialLoad> {
        let token = self.storage.get(TOKEN_KEY).await?;
        let user_json = self.storage.get(USER_KEY).await?;

        let (Some(token), Some(user_json)) = (token, user_json) else {
            return Ok(CredentialLoad::Missing);
        };

        match serde_json::from_str::<UserAccount>(&user_json) {
            Ok(user) => Ok(CredentialLoad::Found {
                token: AuthToken::new(token),
                user,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "Stored user record is unreadable, treating as signed out");
                Ok(CredentialLoad::Corrupt)
            }
        }
    }

    /// Removes both slots in one batch. A no-op when nothing is stored.
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_many(&[TOKEN_KEY, USER_KEY]).await
    }
}
