//! Language preference synchronization.

use std::sync::Arc;

use tokio::sync::watch;

use verdant_core::backend::ProfileBackend;
use verdant_core::error::{Result, VerdantError};
use verdant_core::locale::{LanguageTag, LocaleCache};
use verdant_core::session::SessionManager;

/// Bridges the active locale between the UI, the device cache, and the
/// backend preference record.
///
/// The active locale is a `watch` channel; sending on it is what triggers
/// translated UI to re-render. Changes follow a remote-confirm-then-apply
/// policy: while signed in, the backend write happens first and the local
/// side only moves after it succeeds. The cache therefore always holds a
/// confirmed value and a remote failure needs no rollback.
pub struct LanguageBridge {
    cache: LocaleCache,
    profile: Arc<dyn ProfileBackend>,
    manager: Arc<SessionManager>,
    active: watch::Sender<LanguageTag>,
}

impl LanguageBridge {
    pub fn new(
        cache: LocaleCache,
        profile: Arc<dyn ProfileBackend>,
        manager: Arc<SessionManager>,
    ) -> Self {
        let (active, _) = watch::channel(LanguageTag::default());
        Self {
            cache,
            profile,
            manager,
            active,
        }
    }

    /// Loads the cached locale and publishes it as active.
    ///
    /// Falls back to the default locale when nothing is cached. Call once
    /// at startup, before the first translated render.
    pub async fn initialize(&self) -> Result<LanguageTag> {
        let tag = self.cache.load().await?.unwrap_or_default();
        self.active.send_replace(tag.clone());
        Ok(tag)
    }

    /// The currently active locale.
    pub fn active(&self) -> LanguageTag {
        self.active.borrow().clone()
    }

    /// Subscribes to locale changes.
    pub fn subscribe(&self) -> watch::Receiver<LanguageTag> {
        self.active.subscribe()
    }

    /// Fetches the locales the backend can serve.
    pub async fn available_languages(&self) -> Result<Vec<LanguageTag>> {
        self.profile.available_languages().await
    }

    /// Fetches the signed-in user's stored preference from the backend.
    pub async fn preference(&self) -> Result<LanguageTag> {
        let token = self
            .manager
            .current()
            .token()
            .cloned()
            .ok_or(VerdantError::NotAuthenticated)?;
        self.profile.language_preference(&token).await
    }

    /// Switches the active locale to `tag`.
    ///
    /// Signed in: the preference is written to the backend first; cache
    /// and active locale move only after the write succeeds, so a failure
    /// leaves the UI exactly where it was and propagates to the caller.
    ///
    /// Signed out: the change is device-local. The login screen offers a
    /// language switcher before there is anyone to scope a remote write to.
    pub async fn set_language(&self, tag: LanguageTag) -> Result<()> {
        if let Some(token) = self.manager.current().token().cloned() {
            self.profile.set_language_preference(&token, &tag).await?;
        }

        self.cache.store(&tag).await?;
        tracing::info!(language = %tag, "Active language changed");
        self.active.send_replace(tag);
        Ok(())
    }

    /// Pulls the remote preference and applies it locally.
    ///
    /// Used after login so the device follows the preference the user set
    /// elsewhere. Callers treat a failure as non-fatal; the cached locale
    /// keeps working.
    pub async fn sync_from_remote(&self) -> Result<LanguageTag> {
        let tag = self.preference().await?;
        self.cache.store(&tag).await?;
        self.active.send_replace(tag.clone());
        Ok(tag)
    }
}
