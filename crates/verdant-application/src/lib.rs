//! Use-case orchestration for the Verdant client.
//!
//! Wires the core session machinery to the remote backends: signing in and
//! out end to end, and keeping the language preference in sync between the
//! device and the backend.

pub mod language_bridge;
pub mod session_usecase;

pub use language_bridge::LanguageBridge;
pub use session_usecase::SessionUseCase;
