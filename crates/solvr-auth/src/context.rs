//! Explicit per-session identity handed to workflows.

use solvr_core::enums::{Role, UserRole};
use solvr_core::identity::SessionIdentity;

/// Who the current session acts as.
///
/// Built once at startup from the identity store (or as an anonymous
/// session) and passed to every workflow that needs the user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: Option<String>,
    role: UserRole,
}

impl SessionContext {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role,
        }
    }

    /// A session with no backend account. Requests go out without a user id.
    #[must_use]
    pub const fn anonymous(role: UserRole) -> Self {
        Self {
            user_id: None,
            role,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Which side of a negotiation this session plays.
    #[must_use]
    pub fn negotiation_role(&self) -> Role {
        Role::from(self.role)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

impl From<SessionIdentity> for SessionContext {
    fn from(identity: SessionIdentity) -> Self {
        Self {
            user_id: Some(identity.user_id),
            role: identity.role,
        }
    }
}
