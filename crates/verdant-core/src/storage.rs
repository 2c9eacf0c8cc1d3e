//! Device-local storage interface.

use crate::error::Result;
use async_trait::async_trait;

/// String key-value storage that survives process restarts.
///
/// This is the device-local persistence seam: the credential store and the
/// locale cache both write through it, each under its own keys. Values are
/// plain strings; callers that need structure store JSON.
///
/// Multi-key writes exist so related slots can change together. An
/// implementation must make `set_many` and `remove_many` all-or-nothing:
/// after a crash either every entry of the batch is applied or none is.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Stores every pair in one atomic write.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Removes every key in one atomic write.
    async fn remove_many(&self, keys: &[&str]) -> Result<()>;
}
