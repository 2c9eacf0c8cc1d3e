//! HTTP clients for the Verdant backend.
//!
//! Implements the backend traits from `verdant-core` over reqwest. Each
//! client shares one connection pool and maps transport and status failures
//! into the core error taxonomy.

mod auth;
mod client;
mod profile;

pub use auth::AuthApiClient;
pub use client::ApiClient;
pub use profile::ProfileApiClient;
