//! User, project, and membership domain types.

use chrono::{DateTime, Utc};
use kubedeck_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Username of the administrator seeded on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum accepted password length.
pub const PASSWORD_MAX_LENGTH: usize = 16;

/// Dashboard account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique login name.
    pub name: String,
    /// Display name.
    pub alias: String,
    /// Contact address, settable once.
    pub email: Option<String>,
    /// Encoded password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Names of platform roles granted to the user.
    pub roles: Vec<String>,
    /// Disabled users can neither log in nor pass authorization.
    pub disabled: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Time of the last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates an enabled user stamped with the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        email: Option<String>,
        password_hash: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            email,
            password_hash: password_hash.into(),
            roles,
            disabled: false,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }
}

/// Membership of a user in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUser {
    /// Project the membership belongs to.
    pub project_name: String,
    /// Member username.
    pub username: String,
    /// Names of project roles granted inside the project.
    pub roles: Vec<String>,
}

/// A project grouping applications, environments, and project-scoped RBAC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project name.
    pub name: String,
    /// Display name.
    pub alias: String,
    /// Owning username, granted the project admin role on creation.
    pub owner: Option<String>,
    /// Free form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validates a resource or account name.
///
/// Names are lowercase DNS labels: alphanumerics and `-`, starting and ending
/// alphanumeric, at most 63 characters.
pub fn validate_name(kind: &str, name: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|character| {
                character.is_ascii_lowercase() || character.is_ascii_digit() || character == '-'
            })
        && !name.starts_with('-')
        && !name.ends_with('-');

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{kind} name '{name}' must be a lowercase alphanumeric label of at most 63 characters"
        )))
    }
}

/// Normalizes and validates an email address.
///
/// Returns the trimmed, lowercased address. Requires a single `@` with a
/// non-empty local part and a dotted domain.
pub fn normalize_email(value: &str) -> AppResult<String> {
    let normalized = value.trim().to_lowercase();

    let Some((local, domain)) = normalized.split_once('@') else {
        return Err(AppError::Validation(
            "email address must contain '@'".to_owned(),
        ));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(AppError::Validation(format!(
            "email address '{normalized}' is malformed"
        )));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(AppError::Validation(
            "email domain must contain at least one '.'".to_owned(),
        ));
    }

    if normalized.len() > 254 {
        return Err(AppError::Validation(
            "email address must not exceed 254 characters".to_owned(),
        ));
    }

    Ok(normalized)
}

/// Validates a plaintext password.
///
/// Length must lie within the configured bounds and the password must mix
/// letters and digits.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let has_letter = password.chars().any(|character| character.is_ascii_alphabetic());
    let has_digit = password.chars().any(|character| character.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AppError::Validation(
            "password must contain both letters and digits".to_owned(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, validate_name, validate_password};

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            normalize_email(" Dev@Example.COM ").ok().as_deref(),
            Some("dev@example.com")
        );
        assert!(normalize_email("dev.example.com").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("dev@localhost").is_err());
    }

    #[test]
    fn password_requires_letters_and_digits() {
        assert!(validate_password("Kubedeck12345").is_ok());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("1234567890").is_err());
    }

    #[test]
    fn password_length_is_bounded() {
        assert!(validate_password("abc123").is_err());
        assert!(validate_password("abcdefgh12345678x").is_err());
        assert!(validate_password("abcdefgh1234567").is_ok());
    }

    #[test]
    fn names_are_dns_labels() {
        assert!(validate_name("user", "dev-user1").is_ok());
        assert!(validate_name("user", "Dev").is_err());
        assert!(validate_name("user", "-dev").is_err());
        assert!(validate_name("user", "").is_err());
    }
}
