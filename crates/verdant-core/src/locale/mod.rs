//! Language preference domain.
//!
//! The active locale lives in two places: a device-local cache for instant
//! UI response and a per-user record on the backend. This module holds the
//! locale model and the local cache; the remote half goes through
//! [`crate::backend::ProfileBackend`].

mod cache;
mod model;

pub use cache::{LANGUAGE_KEY, LocaleCache};
pub use model::LanguageTag;
