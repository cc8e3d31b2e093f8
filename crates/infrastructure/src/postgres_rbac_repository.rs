//! PostgreSQL-backed RBAC repository.
//!
//! Platform scoped roles and permissions are stored with an empty project.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{Permission, PolicyEffect, Project, ProjectUser, Role, User};

mod permissions;
mod projects;
mod roles;
mod users;

#[cfg(test)]
mod tests;

/// PostgreSQL implementation of every RBAC repository port.
#[derive(Clone)]
pub struct PostgresRbacRepository {
    pool: PgPool,
}

impl PostgresRbacRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    name: String,
    alias: String,
    email: Option<String>,
    password_hash: String,
    roles: Vec<String>,
    disabled: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            name: row.name,
            alias: row.alias,
            email: row.email,
            password_hash: row.password_hash,
            roles: row.roles,
            disabled: row.disabled,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    project: String,
    name: String,
    alias: String,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            name: row.name,
            alias: row.alias,
            project: project_from_column(row.project),
            permissions: row.permissions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    project: String,
    name: String,
    alias: String,
    resources: Vec<String>,
    actions: Vec<String>,
    effect: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        let effect = row.effect.parse::<PolicyEffect>().map_err(|error| {
            AppError::Internal(format!(
                "permission '{}' has an invalid stored effect: {error}",
                row.name
            ))
        })?;

        Ok(Self {
            name: row.name,
            alias: row.alias,
            project: project_from_column(row.project),
            resources: row.resources,
            actions: row.actions,
            effect,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    name: String,
    alias: String,
    owner: Option<String>,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            name: row.name,
            alias: row.alias,
            owner: row.owner,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProjectUserRow {
    project_name: String,
    username: String,
    roles: Vec<String>,
}

impl From<ProjectUserRow> for ProjectUser {
    fn from(row: ProjectUserRow) -> Self {
        Self {
            project_name: row.project_name,
            username: row.username,
            roles: row.roles,
        }
    }
}

fn project_column(project: Option<&str>) -> &str {
    project.unwrap_or_default()
}

fn project_from_column(project: String) -> Option<String> {
    (!project.is_empty()).then_some(project)
}

/// Maps an insert failure, turning unique violations into `Conflict`.
fn insert_error(error: sqlx::Error, subject: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("{subject} already exists"));
    }

    AppError::Internal(format!("failed to create {subject}: {error}"))
}

/// Maps an affected-row count of zero to `NotFound`.
fn require_affected(rows_affected: u64, subject: &str) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("{subject} does not exist")));
    }

    Ok(())
}
