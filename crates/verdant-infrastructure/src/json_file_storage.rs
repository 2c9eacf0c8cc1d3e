//! File-backed key-value storage.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use verdant_core::error::{Result, VerdantError};
use verdant_core::storage::KeyValueStorage;

use crate::storage::AtomicJsonFile;

/// On-disk shape of the storage file: one JSON object of string slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageFile {
    #[serde(default)]
    slots: BTreeMap<String, String>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl Default for StorageFile {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }
}

/// `KeyValueStorage` over a single JSON file on the device.
///
/// Credentials live here, so the file is written atomically and with 600
/// permissions on Unix. Writes are lock-guarded read-modify-write
/// transactions; the batch operations land in one file write, which is
/// what makes them all-or-nothing.
///
/// Reads are fail-safe per slot: a storage file that no longer parses
/// reads as empty (every `get` answers `None`) while genuine I/O failures
/// still surface as errors. File I/O runs on the blocking pool.
#[derive(Clone)]
pub struct JsonFileStorage {
    file: Arc<AtomicJsonFile<StorageFile>>,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    /// Storage at the default device location (`~/.config/verdant/storage.json`).
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(crate::paths::VerdantPaths::storage_file()?))
    }

    async fn read_slots(&self) -> Result<BTreeMap<String, String>> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || match file.load() {
            Ok(Some(data)) => Ok(data.slots),
            Ok(None) => Ok(BTreeMap::new()),
            Err(VerdantError::Serialization { message }) => {
                tracing::warn!(%message, "Storage file is unreadable, reading as empty");
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err),
        })
        .await
        .map_err(|err| VerdantError::internal(format!("storage task failed: {err}")))?
    }

    async fn write_slots<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            file.update(StorageFile::default(), |data| {
                apply(&mut data.slots);
                data.updated_at = Utc::now();
                Ok(())
            })
        })
        .await
        .map_err(|err| VerdantError::internal(format!("storage task failed: {err}")))?
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.read_slots().await?;
        Ok(slots.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)]).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key]).await
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let owned: Vec<(String, String)> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.write_slots(move |slots| {
            for (key, value) in owned {
                slots.insert(key, value);
            }
        })
        .await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let owned: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.write_slots(move |slots| {
            for key in &owned {
                slots.remove(key);
            }
        })
        .await
    }
}
