//! Session lifecycle management.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::error::{Result, VerdantError};

use super::credentials::{CredentialLoad, CredentialStore};
use super::model::{AuthToken, SessionState, UserAccount};

/// Read handle onto the session state.
///
/// Receivers wake on every transition, so UI code can re-run guard
/// decisions whenever the session changes.
pub type SessionWatch = watch::Receiver<SessionState>;

/// Owns the session state machine.
///
/// The manager is the only writer. Every other component observes through
/// [`SessionManager::watch`] or reads a snapshot with
/// [`SessionManager::current`]; none of them mutate session state directly.
///
/// Each transition persists through the credential store *before* the new
/// state is published. Observers therefore see either the previous state or
/// the complete new one, never a token without its user or a signed-in
/// state that storage does not back.
pub struct SessionManager {
    credentials: CredentialStore,
    state: watch::Sender<SessionState>,
    /// Serializes transitions so overlapping mutations cannot interleave
    /// their persist and publish steps.
    mutation_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager in the `Loading` state.
    ///
    /// Callers must run [`SessionManager::restore`] once at startup to
    /// leave `Loading`; until then guards render nothing and mutations are
    /// refused.
    pub fn new(credentials: CredentialStore) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            credentials,
            state,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Convenience constructor wrapping the manager for shared ownership.
    pub fn shared(credentials: CredentialStore) -> Arc<Self> {
        Arc::new(Self::new(credentials))
    }

    /// Runs the one-time startup transition out of `Loading`.
    ///
    /// Stored credentials become `Authenticated`. Everything else becomes
    /// `Unauthenticated`: missing slots, unreadable records, and even
    /// storage I/O failures. Startup must always reach a usable state, so
    /// restore never fails; read problems are logged and degrade to a
    /// signed-out session.
    ///
    /// Calling restore again after the transition keeps the current state.
    pub async fn restore(&self) -> SessionState {
        let _guard = self.mutation_lock.lock().await;
        if !self.state.borrow().is_loading() {
            tracing::warn!("Session restore requested twice, keeping current state");
            return self.current();
        }

        let next = match self.credentials.load().await {
            Ok(CredentialLoad::Found { token, user }) => {
                tracing::info!(user_id = user.id, "Session restored from device storage");
                SessionState::Authenticated { token, user }
            }
            Ok(CredentialLoad::Missing) => SessionState::Unauthenticated,
            Ok(CredentialLoad::Corrupt) => SessionState::Unauthenticated,
            Err(err) => {
                tracing::error!(error = %err, "Could not read device storage, starting signed out");
                SessionState::Unauthenticated
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Establishes an authenticated session from a token/user pair.
    ///
    /// Persists both credentials first and publishes the new state only
    /// after the write succeeds. On storage failure the session is left
    /// exactly as it was and the error propagates. Logging in over an
    /// existing session replaces it in one transition.
    pub async fn login(&self, token: AuthToken, user: UserAccount) -> Result<()> {
        let _guard = self.mutation_lock.lock().await;
        if self.state.borrow().is_loading() {
            return Err(VerdantError::SessionRestoring);
        }

        self.credentials.save(&token, &user).await?;
        tracing::info!(user_id = user.id, role = %user.role, "Session established");
        self.state.send_replace(SessionState::Authenticated { token, user });
        Ok(())
    }

    /// Ends the session.
    ///
    /// The in-memory state always lands on `Unauthenticated`, even when
    /// clearing storage fails; keeping a locally revoked session alive
    /// would be worse than leaving stale bytes on disk. A clear failure is
    /// still returned so callers can surface it. Logging out while already
    /// signed out is a no-op.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.mutation_lock.lock().await;
        if self.state.borrow().is_loading() {
            return Err(VerdantError::SessionRestoring);
        }

        let cleared = self.credentials.clear().await;
        self.state.send_replace(SessionState::Unauthenticated);
        if let Err(err) = &cleared {
            tracing::error!(error = %err, "Failed to clear persisted credentials during logout");
        } else {
            tracing::info!("Session ended");
        }
        cleared
    }

    /// Replaces the user record of an authenticated session.
    ///
    /// Used after profile edits or a plan upgrade so the session mirrors
    /// the backend. The token is untouched. Fails with `NotAuthenticated`
    /// when nobody is signed in.
    pub async fn update_user(&self, user: UserAccount) -> Result<()> {
        let _guard = self.mutation_lock.lock().await;
        let token = match self.state.borrow().token() {
            Some(token) => token.clone(),
            None => return Err(VerdantError::NotAuthenticated),
        };

        self.credentials.save(&token, &user).await?;
        self.state.send_replace(SessionState::Authenticated { token, user });
        Ok(())
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to session transitions.
    pub fn watch(&self) -> SessionWatch {
        self.state.subscribe()
    }

    /// Waits until the startup restore has finished, then returns the
    /// settled state. Returns immediately when the session already left
    /// `Loading`.
    pub async fn wait_until_ready(&self) -> SessionState {
        let mut watch = self.state.subscribe();
        loop {
            let current = watch.borrow_and_update().clone();
            if !current.is_loading() {
                return current;
            }
            if watch.changed().await.is_err() {
                return current;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::credentials::{TOKEN_KEY, USER_KEY};
    use crate::session::model::Role;
    use crate::storage::KeyValueStorage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeStorage {
        slots: StdMutex<HashMap<String, String>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl FakeStorage {
        fn seeded(entries: &[(&str, &str)]) -> Arc<Self> {
            let storage = Self::default();
            {
                let mut slots = storage.slots.lock().unwrap();
                for (key, value) in entries {
                    slots.insert(key.to_string(), value.to_string());
                }
            }
            Arc::new(storage)
        }

        fn slot(&self, key: &str) -> Option<String> {
            self.slots.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStorage for FakeStorage {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(VerdantError::storage("read failed"));
            }
            Ok(self.slot(key))
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.set_many(&[(key, value)]).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.remove_many(&[key]).await
        }

        async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(VerdantError::storage("write failed"));
            }
            let mut slots = self.slots.lock().unwrap();
            for (key, value) in entries {
                slots.insert(key.to_string(), value.to_string());
            }
            Ok(())
        }

        async fn remove_many(&self, keys: &[&str]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(VerdantError::storage("remove failed"));
            }
            let mut slots = self.slots.lock().unwrap();
            for key in keys {
                slots.remove(*key);
            }
            Ok(())
        }
    }

    fn manager_over(storage: Arc<FakeStorage>) -> SessionManager {
        SessionManager::new(CredentialStore::new(storage))
    }

    fn regular_user(id: i64) -> UserAccount {
        UserAccount {
            id,
            role: Role::Regular,
            name: String::new(),
            email: String::new(),
        }
    }

    #[tokio::test]
    async fn starts_in_loading() {
        let manager = manager_over(FakeStorage::seeded(&[]));
        assert!(manager.current().is_loading());
    }

    #[tokio::test]
    async fn restore_recovers_stored_session() {
        let storage = FakeStorage::seeded(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":1,"role":"Regular"}"#),
        ]);
        let manager = manager_over(storage);

        let state = manager.restore().await;
        match state {
            SessionState::Authenticated { token, user } => {
                assert_eq!(token.as_str(), "abc");
                assert_eq!(user.role, Role::Regular);
            }
            other => panic!("expected Authenticated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn restore_with_empty_storage_signs_out() {
        let manager = manager_over(FakeStorage::seeded(&[]));
        assert_eq!(manager.restore().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn restore_treats_corrupt_user_as_signed_out() {
        let storage = FakeStorage::seeded(&[(TOKEN_KEY, "abc"), (USER_KEY, "{not valid json")]);
        let manager = manager_over(storage);
        assert_eq!(manager.restore().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn restore_survives_storage_read_failures() {
        let storage = FakeStorage::seeded(&[]);
        storage.fail_reads.store(true, Ordering::SeqCst);
        let manager = manager_over(storage);
        assert_eq!(manager.restore().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn restore_after_restore_keeps_state() {
        let storage = FakeStorage::seeded(&[]);
        let manager = manager_over(storage);
        manager.restore().await;
        manager
            .login(AuthToken::new("t"), regular_user(5))
            .await
            .unwrap();

        let state = manager.restore().await;
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn login_persists_before_publishing() {
        let storage = FakeStorage::seeded(&[]);
        let manager = manager_over(storage.clone());
        manager.restore().await;

        manager
            .login(AuthToken::new("t-1"), regular_user(1))
            .await
            .unwrap();

        assert!(manager.current().is_authenticated());
        assert_eq!(storage.slot(TOKEN_KEY).as_deref(), Some("t-1"));
        assert!(storage.slot(USER_KEY).is_some());
    }

    #[tokio::test]
    async fn login_over_existing_session_replaces_it() {
        let storage = FakeStorage::seeded(&[]);
        let manager = manager_over(storage.clone());
        manager.restore().await;
        manager
            .login(AuthToken::new("t-1"), regular_user(1))
            .await
            .unwrap();

        manager
            .login(AuthToken::new("t-2"), regular_user(2))
            .await
            .unwrap();

        match manager.current() {
            SessionState::Authenticated { token, user } => {
                assert_eq!(token.as_str(), "t-2");
                assert_eq!(user.id, 2);
            }
            other => panic!("expected Authenticated, got {:?}", other),
        }
        // Persisted slots follow the replacement too.
        assert_eq!(storage.slot(TOKEN_KEY).as_deref(), Some("t-2"));
        assert!(
            storage
                .slot(USER_KEY)
                .is_some_and(|json| json.contains("\"id\":2"))
        );
    }

    #[tokio::test]
    async fn failed_login_persist_leaves_state_untouched() {
        let storage = FakeStorage::seeded(&[]);
        let manager = manager_over(storage.clone());
        manager.restore().await;
        storage.fail_writes.store(true, Ordering::SeqCst);

        let err = manager
            .login(AuthToken::new("t-1"), regular_user(1))
            .await
            .unwrap_err();

        assert!(err.is_storage());
        assert_eq!(manager.current(), SessionState::Unauthenticated);
        assert!(storage.slot(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn mutations_are_refused_while_loading() {
        let manager = manager_over(FakeStorage::seeded(&[]));

        let login = manager.login(AuthToken::new("t"), regular_user(1)).await;
        assert!(matches!(login, Err(VerdantError::SessionRestoring)));

        let logout = manager.logout().await;
        assert!(matches!(logout, Err(VerdantError::SessionRestoring)));

        assert!(manager.current().is_loading());
    }

    #[tokio::test]
    async fn logout_clears_storage_and_state() {
        let storage = FakeStorage::seeded(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":1,"role":"Regular"}"#),
        ]);
        let manager = manager_over(storage.clone());
        manager.restore().await;

        manager.logout().await.unwrap();

        assert_eq!(manager.current(), SessionState::Unauthenticated);
        assert!(storage.slot(TOKEN_KEY).is_none());
        assert!(storage.slot(USER_KEY).is_none());

        // Logging out again stays a clean no-op.
        manager.logout().await.unwrap();
        assert_eq!(manager.current(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn logout_signs_out_even_when_clear_fails() {
        let storage = FakeStorage::seeded(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":1,"role":"Regular"}"#),
        ]);
        let manager = manager_over(storage.clone());
        manager.restore().await;
        storage.fail_writes.store(true, Ordering::SeqCst);

        let result = manager.logout().await;

        assert!(result.is_err());
        assert_eq!(manager.current(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn update_user_swaps_record_and_keeps_token() {
        let storage = FakeStorage::seeded(&[]);
        let manager = manager_over(storage.clone());
        manager.restore().await;
        manager
            .login(AuthToken::new("t-1"), regular_user(1))
            .await
            .unwrap();

        let upgraded = UserAccount {
            role: Role::Premium,
            ..regular_user(1)
        };
        manager.update_user(upgraded).await.unwrap();

        match manager.current() {
            SessionState::Authenticated { token, user } => {
                assert_eq!(token.as_str(), "t-1");
                assert_eq!(user.role, Role::Premium);
            }
            other => panic!("expected Authenticated, got {:?}", other),
        }
        assert!(
            storage
                .slot(USER_KEY)
                .is_some_and(|json| json.contains("Premium"))
        );
    }

    #[tokio::test]
    async fn update_user_requires_a_session() {
        let manager = manager_over(FakeStorage::seeded(&[]));
        manager.restore().await;

        let err = manager.update_user(regular_user(1)).await.unwrap_err();
        assert!(err.is_not_authenticated());
    }

    #[tokio::test]
    async fn watchers_observe_every_transition() {
        let storage = FakeStorage::seeded(&[]);
        let manager = manager_over(storage);
        let mut watch = manager.watch();
        assert!(watch.borrow_and_update().is_loading());

        manager.restore().await;
        watch.changed().await.unwrap();
        assert_eq!(*watch.borrow_and_update(), SessionState::Unauthenticated);

        manager
            .login(AuthToken::new("t"), regular_user(9))
            .await
            .unwrap();
        watch.changed().await.unwrap();
        assert!(watch.borrow_and_update().is_authenticated());

        manager.logout().await.unwrap();
        watch.changed().await.unwrap();
        assert_eq!(*watch.borrow_and_update(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn wait_until_ready_blocks_for_restore() {
        let storage = FakeStorage::seeded(&[
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":1,"role":"Regular"}"#),
        ]);
        let manager = Arc::new(manager_over(storage));

        let waiter = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.wait_until_ready().await })
        };
        manager.restore().await;

        let settled = waiter.await.unwrap();
        assert!(settled.is_authenticated());

        // Already settled, returns immediately.
        assert!(manager.wait_until_ready().await.is_authenticated());
    }
}
