//! Session use case implementation.
//!
//! Orchestrates the backend auth service and the local `SessionManager` so
//! callers get whole operations: a login that both convinces the backend
//! and persists on the device, a logout that revokes remotely and clears
//! locally.

use std::sync::Arc;

use verdant_core::backend::{AuthBackend, ProfileBackend};
use verdant_core::error::{Result, VerdantError};
use verdant_core::session::{SessionManager, SessionState, UserAccount};

/// Use case for establishing and ending sessions.
///
/// The manager stays the single writer of session state; this type only
/// sequences backend calls around its transitions. All collaborators are
/// `Arc`-shared and the use case itself is cheap to clone.
#[derive(Clone)]
pub struct SessionUseCase {
    manager: Arc<SessionManager>,
    auth: Arc<dyn AuthBackend>,
    profile: Arc<dyn ProfileBackend>,
}

impl SessionUseCase {
    pub fn new(
        manager: Arc<SessionManager>,
        auth: Arc<dyn AuthBackend>,
        profile: Arc<dyn ProfileBackend>,
    ) -> Self {
        Self {
            manager,
            auth,
            profile,
        }
    }

    /// The session manager, for readers that want watches or snapshots.
    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Runs the startup restore and returns the settled state.
    pub async fn initialize(&self) -> SessionState {
        self.manager.restore().await
    }

    /// Signs in with an email/password pair.
    ///
    /// The backend call comes first; only an accepted login touches local
    /// state. A rejection propagates as `AuthRejected` with the backend's
    /// message and the session stays signed out.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount> {
        let session = self.auth.login(email, password).await?;
        let user = session.user.clone();
        self.manager.login(session.token, session.user).await?;
        Ok(user)
    }

    /// Signs in with a Google ID token.
    pub async fn login_with_google(&self, id_token: &str) -> Result<UserAccount> {
        let session = self.auth.login_with_google(id_token).await?;
        let user = session.user.clone();
        self.manager.login(session.token, session.user).await?;
        Ok(user)
    }

    /// Signs out.
    ///
    /// Remote revocation is best effort: a backend that cannot be reached
    /// must not keep the user signed in on the device, so its failure is
    /// logged and the local logout still runs.
    pub async fn logout(&self) -> Result<()> {
        if let Some(token) = self.manager.current().token().cloned() {
            if let Err(err) = self.auth.logout(&token).await {
                tracing::warn!(error = %err, "Remote session revocation failed, signing out locally");
            }
        }
        self.manager.logout().await
    }

    /// Re-fetches the account record and mirrors it into the session.
    ///
    /// Call after profile edits or a plan upgrade so capability checks see
    /// the new role without a re-login.
    pub async fn refresh_account(&self) -> Result<UserAccount> {
        let token = self
            .manager
            .current()
            .token()
            .cloned()
            .ok_or(VerdantError::NotAuthenticated)?;

        let user = self.profile.account(&token).await?;
        self.manager.update_user(user.clone()).await?;
        Ok(user)
    }
}
