pub mod backend;
pub mod config;
pub mod error;
pub mod locale;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{Result, VerdantError};
