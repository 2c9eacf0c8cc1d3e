//! Device-side infrastructure for the Verdant client.
//!
//! File-backed storage, platform paths, and configuration loading. The
//! domain crate defines the seams (`KeyValueStorage`, `ClientConfig`);
//! concrete implementations live here.

pub mod config_service;
pub mod json_file_storage;
pub mod memory_storage;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use json_file_storage::JsonFileStorage;
pub use memory_storage::MemoryStorage;
pub use paths::{PathError, VerdantPaths};
