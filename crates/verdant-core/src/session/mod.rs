//! Session domain module.
//!
//! Everything about who is signed in lives here: the state machine, the
//! credential persistence behind it, and the route guard that consumes it.
//!
//! # Module Structure
//!
//! - `model`: session domain models (`SessionState`, `UserAccount`, `Role`, `AuthToken`)
//! - `credentials`: token/user persistence over device storage (`CredentialStore`)
//! - `manager`: the single-writer state machine (`SessionManager`)
//! - `guard`: pure routing decisions (`RouteGuard`, `RouteDecision`)

mod credentials;
mod guard;
mod manager;
mod model;

// Re-export public API
pub use credentials::{CredentialLoad, CredentialStore, TOKEN_KEY, USER_KEY};
pub use guard::{RouteDecision, RouteGuard};
pub use manager::{SessionManager, SessionWatch};
pub use model::{AuthToken, Role, SessionState, UserAccount};
