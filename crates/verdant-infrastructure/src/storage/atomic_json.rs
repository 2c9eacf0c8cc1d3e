//! Atomic JSON file operations.
//!
//! Provides a thin layer for safe concurrent access to JSON state files.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use verdant_core::error::{Result, VerdantError};

/// A handle to an atomic JSON file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: File locking prevents concurrent modifications
/// - **Durability**: Explicit fsync before rename
///
/// Files are written with 600 permissions on Unix; credential material
/// goes through this handle.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new atomic JSON file handle.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file and deserializes it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the file atomically.
    ///
    /// Writes to a temporary file in the same directory, fsyncs, restricts
    /// permissions, then renames over the target.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp_file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Performs a transactional update with file locking.
    ///
    /// Loads the current data (falling back to `default_value` when the
    /// file is absent or its content no longer parses), applies `f`, and
    /// saves atomically. Unparseable content being replaced rather than
    /// fatal keeps a damaged state file from wedging the client; the old
    /// bytes are gone after the next write either way.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = match self.load() {
            Ok(Some(data)) => data,
            Ok(None) => default_value,
            Err(VerdantError::Serialization { message }) => {
                tracing::warn!(%message, "State file is unreadable, rewriting from defaults");
                default_value
            }
            Err(err) => return Err(err),
        };

        f(&mut data)?;
        self.save(&data)
    }

    /// Gets a temporary file path for atomic writes.
    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| VerdantError::storage("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| VerdantError::storage("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that automatically releases the lock when dropped.
///
/// The lock file itself is never removed: unlinking it would let one
/// process lock the orphaned inode while another locks a freshly created
/// file at the same path, and both would believe they hold the exclusive
/// lock. A stale empty `.lock` file on disk costs nothing.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock on the given path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|err| VerdantError::storage(format!("Failed to acquire lock: {err}")))?;
        }

        #[cfg(not(unix))]
        {
            // No file locking on non-Unix systems; acceptable for a
            // single-user client.
        }

        // Unlock is automatic when the file handle is dropped.
        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    type Slots = BTreeMap<String, String>;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestState {
        slots: Slots,
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestState>::new(dir.path().join("state.json"));

        let mut state = TestState::default();
        state.slots.insert("k".into(), "v".into());
        file.save(&state).unwrap();

        assert_eq!(file.load().unwrap().unwrap(), state);
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestState>::new(dir.path().join("absent.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestState>::new(dir.path().join("state.json"));
        file.save(&TestState::default()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["state.json".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestState>::new(dir.path().join("state.json"));
        file.save(&TestState::default()).unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn update_applies_on_top_of_existing_data() {
        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestState>::new(dir.path().join("state.json"));

        file.update(TestState::default(), |state| {
            state.slots.insert("a".into(), "1".into());
            Ok(())
        })
        .unwrap();
        file.update(TestState::default(), |state| {
            state.slots.insert("b".into(), "2".into());
            Ok(())
        })
        .unwrap();

        let state = file.load().unwrap().unwrap();
        assert_eq!(state.slots.len(), 2);
        assert_eq!(state.slots["a"], "1");
    }

    #[test]
    fn lock_file_stays_and_can_be_relocked() {
        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestState>::new(dir.path().join("state.json"));

        file.update(TestState::default(), |_| Ok(())).unwrap();

        // The lock file outlives the transaction; removing it would let
        // two processes hold the "exclusive" lock at once.
        let lock_path = dir.path().join("state.lock");
        assert!(lock_path.exists());

        // And the same file locks again for the next transaction.
        file.update(TestState::default(), |state| {
            state.slots.insert("k".into(), "v".into());
            Ok(())
        })
        .unwrap();
        assert!(lock_path.exists());
        assert_eq!(file.load().unwrap().unwrap().slots["k"], "v");
    }

    #[test]
    fn update_replaces_unparseable_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not valid json").unwrap();

        let file = AtomicJsonFile::<TestState>::new(path);
        file.update(TestState::default(), |state| {
            state.slots.insert("fresh".into(), "start".into());
            Ok(())
        })
        .unwrap();

        let state = file.load().unwrap().unwrap();
        assert_eq!(state.slots["fresh"], "start");
    }
}
