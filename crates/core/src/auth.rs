use serde::{Deserialize, Serialize};

/// User information persisted in the authenticated session.
///
/// Only the user id is authoritative. Roles are always re-read from the user
/// store when a workflow operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: i64,
    display_name: String,
    email: String,
}

impl UserIdentity {
    /// Creates a user identity from a persisted user.
    #[must_use]
    pub fn new(user_id: i64, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Returns the numeric user id.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}
