//! In-memory key-value storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use verdant_core::error::Result;
use verdant_core::storage::KeyValueStorage;

/// `KeyValueStorage` that lives and dies with the process.
///
/// Used by tests and by ephemeral sessions that should leave nothing on
/// the device.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with the given slots.
    pub fn seeded(entries: &[(&str, &str)]) -> Self {
        let storage = Self::new();
        {
            let mut slots = storage.slots.lock().unwrap();
            for (key, value) in entries {
                slots.insert(key.to_string(), value.to_string());
            }
        }
        storage
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)]).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key]).await
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut slots = self.slots.lock().unwrap();
        for (key, value) in entries {
            slots.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut slots = self.slots.lock().unwrap();
        for key in keys {
            slots.remove(*key);
        }
        Ok(())
    }
}
