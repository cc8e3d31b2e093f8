//! Account lifecycle, login, and user detail views.
//!
//! Login failures report one generic message whatever the cause so callers
//! cannot tell which accounts exist.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{
    ADMIN_ROLE_NAME, DEFAULT_ADMIN_USERNAME, Permission, Project, Role, User,
    normalize_email, validate_name, validate_password,
};

use crate::{
    AuthorizationService, CreateUserInput, PasswordHasher, ProjectRepository, RoleRepository,
    UpdateUserInput, UserQuery, UserRepository,
};


/// One page of users with the total match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserList {
    /// Users on the requested page.
    pub users: Vec<User>,
    /// Number of users matching the filter.
    pub total: usize,
}

/// A user with its platform roles and project memberships resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetail {
    /// The user record.
    pub user: User,
    /// Platform roles granted to the user that still exist.
    pub roles: Vec<Role>,
    /// Projects the user is a member of.
    pub projects: Vec<Project>,
}

/// Everything the dashboard needs about the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUserInfo {
    /// The user record.
    pub user: User,
    /// Projects the user is a member of.
    pub projects: Vec<Project>,
    /// Policies granted through platform roles.
    pub platform_permissions: Vec<Permission>,
    /// Policies granted inside each project, keyed by project name.
    pub project_permissions: BTreeMap<String, Vec<Permission>>,
}

/// Application service for dashboard accounts.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    projects: Arc<dyn ProjectRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    authorization: AuthorizationService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        projects: Arc<dyn ProjectRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        authorization: AuthorizationService,
    ) -> Self {
        Self {
            users,
            roles,
            projects,
            password_hasher,
            authorization,
        }
    }

    /// Seeds the administrator account when it does not exist yet.
    pub async fn init(&self, initial_password: &str) -> AppResult<()> {
        if self.users.find_user(DEFAULT_ADMIN_USERNAME).await?.is_some() {
            return Ok(());
        }

        validate_password(initial_password)?;
        let password_hash = self.password_hasher.hash_password(initial_password)?;
        self.users
            .create_user(User::new(
                DEFAULT_ADMIN_USERNAME,
                "Administrator",
                None,
                password_hash,
                vec![ADMIN_ROLE_NAME.to_owned()],
            ))
            .await?;

        tracing::info!(user = DEFAULT_ADMIN_USERNAME, "seeded administrator account");
        Ok(())
    }

    /// Returns one user.
    pub async fn get_user(&self, name: &str) -> AppResult<User> {
        self.users
            .find_user(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{name}' does not exist")))
    }

    /// Returns one user with its role and project details.
    ///
    /// Failing role lookups leave the role list empty. Memberships of
    /// projects that cannot be loaded are skipped.
    pub async fn detail_user(&self, name: &str) -> AppResult<UserDetail> {
        let user = self.get_user(name).await?;

        let roles = if user.roles.is_empty() {
            Vec::new()
        } else {
            match self.roles.find_roles(None, &user.roles).await {
                Ok(roles) => roles,
                Err(error) => {
                    tracing::warn!(user = %name, error = %error, "failed to load platform roles");
                    Vec::new()
                }
            }
        };

        let mut projects = Vec::new();
        for membership in self.projects.list_memberships(&user.name).await? {
            match self.projects.find_project(&membership.project_name).await {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => {}
                Err(error) => {
                    tracing::error!(
                        project = %membership.project_name,
                        error = %error,
                        "failed to load project of membership"
                    );
                }
            }
        }

        Ok(UserDetail {
            user,
            roles,
            projects,
        })
    }

    /// Lists users matching `query`, paginated when a page is requested.
    pub async fn list_users(&self, query: &UserQuery) -> AppResult<UserList> {
        let matching: Vec<User> = self
            .users
            .list_users()
            .await?
            .into_iter()
            .filter(|user| {
                contains_ignore_case(Some(user.name.as_str()), query.name.as_deref())
                    && contains_ignore_case(Some(user.alias.as_str()), query.alias.as_deref())
                    && contains_ignore_case(user.email.as_deref(), query.email.as_deref())
            })
            .collect();
        let total = matching.len();

        let users = match query.page {
            Some(page) if query.page_size > 0 => matching
                .into_iter()
                .skip(page.saturating_sub(1).saturating_mul(query.page_size))
                .take(query.page_size)
                .collect(),
            _ => matching,
        };

        Ok(UserList { users, total })
    }

    /// Creates a user with hashed credentials.
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        validate_name("user", &input.name)?;
        validate_password(&input.password)?;
        let email = input.email.as_deref().map(normalize_email).transpose()?;
        self.require_platform_roles(&input.roles).await?;

        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let user = User::new(input.name, input.alias, email, password_hash, input.roles);
        self.users.create_user(user.clone()).await?;

        tracing::info!(user = %user.name, "created user");
        Ok(user)
    }

    /// Applies the present fields of `input` to a user.
    ///
    /// An email address can be set once and not changed afterwards.
    pub async fn update_user(&self, name: &str, input: UpdateUserInput) -> AppResult<User> {
        let mut user = self.get_user(name).await?;

        if let Some(alias) = input.alias {
            user.alias = alias;
        }

        if let Some(email) = input.email.as_deref() {
            let email = normalize_email(email)?;
            match user.email.as_deref() {
                Some(current) if current != email => {
                    return Err(AppError::Validation(
                        "the email address of a user cannot be changed".to_owned(),
                    ));
                }
                _ => user.email = Some(email),
            }
        }

        if let Some(password) = input.password.as_deref() {
            validate_password(password)?;
            user.password_hash = self.password_hasher.hash_password(password)?;
        }

        if let Some(roles) = input.roles {
            self.require_platform_roles(&roles).await?;
            user.roles = roles;
        }

        self.users.save_user(user.clone()).await?;
        Ok(user)
    }

    /// Deletes a user together with its project memberships.
    pub async fn delete_user(&self, name: &str) -> AppResult<()> {
        self.get_user(name).await?;
        self.projects.delete_memberships(name).await?;
        self.users.delete_user(name).await?;

        tracing::info!(user = %name, "deleted user");
        Ok(())
    }

    /// Disables a user. Fails with `Conflict` when already disabled.
    pub async fn disable_user(&self, name: &str) -> AppResult<User> {
        self.set_disabled(name, true).await
    }

    /// Enables a user. Fails with `Conflict` when already enabled.
    pub async fn enable_user(&self, name: &str) -> AppResult<User> {
        self.set_disabled(name, false).await
    }

    /// Verifies credentials and records the login time.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let failed = || AppError::Unauthorized("invalid username or password".to_owned());

        let Some(mut user) = self.users.find_user(username).await? else {
            let _ = self.password_hasher.hash_password(password);
            return Err(failed());
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            tracing::debug!(user = %username, "rejected login with invalid password");
            return Err(failed());
        }

        if user.disabled {
            tracing::debug!(user = %username, "rejected login for disabled user");
            return Err(failed());
        }

        user.last_login_at = Some(Utc::now());
        self.users.save_user(user.clone()).await?;
        Ok(user)
    }

    /// Returns the logged-in user with every policy granted to them.
    pub async fn login_user_info(&self, username: &str) -> AppResult<LoginUserInfo> {
        let user = self.get_user(username).await?;
        let platform_permissions = self
            .authorization
            .user_permissions(&user, None, true)
            .await?;

        let mut projects = Vec::new();
        let mut project_permissions = BTreeMap::new();
        for membership in self.projects.list_memberships(&user.name).await? {
            let Some(project) = self.projects.find_project(&membership.project_name).await? else {
                continue;
            };
            let permissions = self
                .authorization
                .user_permissions(&user, Some(&project.name), false)
                .await?;
            project_permissions.insert(project.name.clone(), permissions);
            projects.push(project);
        }

        Ok(LoginUserInfo {
            user,
            projects,
            platform_permissions,
            project_permissions,
        })
    }

    async fn set_disabled(&self, name: &str, disabled: bool) -> AppResult<User> {
        let mut user = self.get_user(name).await?;
        if user.disabled == disabled {
            let state = if disabled { "disabled" } else { "enabled" };
            return Err(AppError::Conflict(format!(
                "user '{name}' is already {state}"
            )));
        }

        user.disabled = disabled;
        self.users.save_user(user.clone()).await?;
        Ok(user)
    }

    async fn require_platform_roles(&self, roles: &[String]) -> AppResult<()> {
        if roles.is_empty() {
            return Ok(());
        }

        let found = self.roles.find_roles(None, roles).await?;
        match roles
            .iter()
            .find(|name| !found.iter().any(|role| &role.name == *name))
        {
            Some(missing) => Err(AppError::Validation(format!(
                "platform role '{missing}' does not exist"
            ))),
            None => Ok(()),
        }
    }
}

fn contains_ignore_case(value: Option<&str>, needle: Option<&str>) -> bool {
    match needle.map(str::trim).filter(|needle| !needle.is_empty()) {
        None => true,
        Some(needle) => value.is_some_and(|value| {
            value.to_lowercase().contains(needle.to_lowercase().as_str())
        }),
    }
}
