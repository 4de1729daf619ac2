use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Role, UserRole};

/// Who is acting in the current session.
///
/// Produced by `solvr-auth` after login/registration and persisted as a small
/// opaque key. Contains only data fields, no auth logic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Backend user id (opaque string).
    pub user_id: String,
    /// Marketplace role the user logged in as.
    pub role: UserRole,
}

impl SessionIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// The negotiation role implied by the account role.
    #[must_use]
    pub fn negotiation_role(&self) -> Role {
        Role::from(self.role)
    }
}
