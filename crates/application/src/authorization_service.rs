//! Per-request authorization decisions.
//!
//! Every gated request walks the same sequence: authenticate the user,
//! resolve the project context, instantiate the requested resource from the
//! endpoint template, load the applicable policies, and evaluate them.

use std::sync::Arc;

use kubedeck_core::{AppError, AppResult, UserIdentity};
use kubedeck_domain::{PROJECT_PATH_PARAM, RequestResourceAction, ResourceName, User};

use crate::{
    PermissionRepository, PermissionRequirement, ProjectRepository, RoleRepository,
    UserRepository,
};

mod context;
mod permissions;


/// Access to the parameters of the request being authorized.
///
/// Absent parameters read as an empty string.
pub trait RequestParameters: Send + Sync {
    /// Returns a path parameter by name.
    fn path_param(&self, name: &str) -> String;

    /// Returns a query parameter by name.
    fn query_param(&self, name: &str) -> String;
}

/// Outcome of a permitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedRequest {
    /// Authenticated username.
    pub username: String,
    /// Project the request was evaluated in, if any.
    pub project: Option<String>,
}

/// Application service deciding whether a user may perform a request.
#[derive(Clone)]
pub struct AuthorizationService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            projects,
        }
    }

    /// Decides one request against the policies of its user.
    ///
    /// Fails with `Unauthorized` when no identity is present or the user
    /// cannot be loaded, and with `Forbidden` when the policies reject the
    /// request or cannot be read.
    pub async fn authorize(
        &self,
        requirement: &PermissionRequirement,
        identity: Option<&UserIdentity>,
        params: &dyn RequestParameters,
    ) -> AppResult<AuthorizedRequest> {
        let Some(identity) = identity else {
            return Err(AppError::Unauthorized(
                "authentication is required".to_owned(),
            ));
        };
        let user = self.authenticated_user(identity.username()).await?;

        let project = self.resolve_project_context(params).await;
        let resource = ResourceName::instantiate(requirement.template(), |name| {
            if name == PROJECT_PATH_PARAM {
                project.clone().unwrap_or_default()
            } else {
                params.path_param(name)
            }
        });
        let request = RequestResourceAction::new(resource, requirement.actions().to_vec());

        let policies = match self.user_permissions(&user, project.as_deref(), true).await {
            Ok(policies) => policies,
            Err(error) => {
                tracing::error!(
                    user = %user.name,
                    error = %error,
                    "failed to load permission policies"
                );
                return Err(AppError::Forbidden(
                    "permission policies could not be loaded".to_owned(),
                ));
            }
        };

        if !request.is_allowed(&policies) {
            tracing::debug!(
                user = %user.name,
                resource = %request.resource(),
                actions = ?request.actions(),
                "request rejected by permission policies"
            );
            return Err(AppError::Forbidden(
                "you do not have permission to perform this action".to_owned(),
            ));
        }

        Ok(AuthorizedRequest {
            username: user.name,
            project,
        })
    }

    async fn authenticated_user(&self, username: &str) -> AppResult<User> {
        match self.users.find_user(username).await {
            Ok(Some(user)) if !user.disabled => Ok(user),
            Ok(_) => Err(AppError::Unauthorized(format!(
                "user '{username}' is not active"
            ))),
            Err(error) => {
                tracing::warn!(user = %username, error = %error, "failed to load user");
                Err(AppError::Unauthorized(format!(
                    "user '{username}' could not be loaded"
                )))
            }
        }
    }
}
