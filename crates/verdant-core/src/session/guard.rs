//! Route gating for protected views.

use super::model::{Role, SessionState};

/// What the caller should do with a guarded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The startup restore has not settled; render nothing yet.
    Pending,
    /// Show the protected content.
    Render,
    /// Nobody is signed in; send the user to the login view.
    RedirectToLogin,
    /// Signed in but missing the required capability; send the user to the
    /// upgrade view.
    RedirectToUpgrade,
}

/// Pure decision logic for a protected view.
///
/// A guard holds no state beyond its role requirement. Evaluate it against
/// the current [`SessionState`] on every session change; same state in,
/// same decision out.
///
/// While the session is `Loading` the answer is always `Pending`, never a
/// redirect. Redirecting before the restore settles would bounce users
/// with valid stored credentials through the login screen on every start.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGuard {
    required_roles: Option<Vec<Role>>,
}

impl RouteGuard {
    /// Guard that admits any signed-in user.
    pub fn authenticated() -> Self {
        Self {
            required_roles: None,
        }
    }

    /// Guard that admits only users holding one of `roles`.
    ///
    /// An empty list admits no one; every signed-in user is sent to
    /// upgrade. Useful for soft-disabling a view.
    pub fn any_of<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self {
            required_roles: Some(roles.into_iter().collect()),
        }
    }

    /// Guard for views that need a premium plan.
    pub fn premium() -> Self {
        Self::any_of([Role::Premium])
    }

    /// Decides what to do for the given session state.
    ///
    /// Authentication is checked before capability: a signed-out user is
    /// sent to login even when the view also has role requirements.
    pub fn decide(&self, state: &SessionState) -> RouteDecision {
        match state {
            SessionState::Loading => RouteDecision::Pending,
            SessionState::Unauthenticated => RouteDecision::RedirectToLogin,
            SessionState::Authenticated { user, .. } => match &self.required_roles {
                Some(roles) if !roles.contains(&user.role) => RouteDecision::RedirectToUpgrade,
                _ => RouteDecision::Render,
            },
        }
    }
}
