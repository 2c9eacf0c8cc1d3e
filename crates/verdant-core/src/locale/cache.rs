//! Device-local cache of the active locale.

use std::sync::Arc;

use crate::error::Result;
use crate::storage::KeyValueStorage;

use super::model::LanguageTag;

/// Storage key holding the cached locale code.
pub const LANGUAGE_KEY: &str = "language";

/// Caches the last confirmed locale on the device.
///
/// Shares the storage with the credential slots but is independent of
/// them: signing out does not forget the user's language.
#[derive(Clone)]
pub struct LocaleCache {
    storage: Arc<dyn KeyValueStorage>,
}

impl LocaleCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Reads the cached locale.
    ///
    /// A missing or blank slot yields `None` so the caller falls back to
    /// the default locale; only storage I/O failures are errors.
    pub async fn load(&self) -> Result<Option<LanguageTag>> {
        let raw = self.storage.get(LANGUAGE_KEY).await?;
        Ok(raw.and_then(LanguageTag::parse))
    }

    /// Stores `tag` as the active locale.
    pub async fn store(&self, tag: &LanguageTag) -> Result<()> {
        self.storage.set(LANGUAGE_KEY, tag.as_str()).await
    }
}
