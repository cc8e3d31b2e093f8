use serde::{Deserialize, Serialize};

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    username: String,
    alias: String,
}

impl UserIdentity {
    /// Creates a user identity from a login name and display alias.
    #[must_use]
    pub fn new(username: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            alias: alias.into(),
        }
    }

    /// Returns the unique login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display alias for the current user.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }
}
