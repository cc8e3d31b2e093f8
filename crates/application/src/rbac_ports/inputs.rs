/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name in scope.
    pub name: String,
    /// Display name.
    pub alias: String,
    /// Names of permissions in the same scope.
    pub permissions: Vec<String>,
}

/// Input payload for updating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Display name.
    pub alias: String,
    /// Names of permissions in the same scope.
    pub permissions: Vec<String>,
}

/// Input payload for creating permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Unique permission name in scope.
    pub name: String,
    /// Display name.
    pub alias: String,
    /// Resource patterns.
    pub resources: Vec<String>,
    /// Granted actions, `*` when empty.
    pub actions: Vec<String>,
    /// `Allow` or `Deny`, `Allow` when absent.
    pub effect: Option<String>,
}

/// Input payload for updating permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// Display name.
    pub alias: String,
    /// Resource patterns.
    pub resources: Vec<String>,
    /// Granted actions, `*` when empty.
    pub actions: Vec<String>,
    /// `Allow` or `Deny`, `Allow` when absent.
    pub effect: Option<String>,
}

/// Input payload for creating projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectInput {
    /// Unique project name.
    pub name: String,
    /// Display name.
    pub alias: String,
    /// Username granted the project admin role.
    pub owner: Option<String>,
    /// Free form description.
    pub description: String,
}

/// Input payload for creating users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Unique login name.
    pub name: String,
    /// Display name.
    pub alias: String,
    /// Contact address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: String,
    /// Platform role names.
    pub roles: Vec<String>,
}

/// Input payload for updating users. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// Display name.
    pub alias: Option<String>,
    /// Contact address, only accepted while none is set.
    pub email: Option<String>,
    /// Plaintext replacement password.
    pub password: Option<String>,
    /// Replacement platform role names.
    pub roles: Option<Vec<String>>,
}

/// Filter and pagination for user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the alias.
    pub alias: Option<String>,
    /// Case-insensitive substring of the email.
    pub email: Option<String>,
    /// One-based page number, every match when `None`.
    pub page: Option<usize>,
    /// Page size used with `page`.
    pub page_size: usize,
}
