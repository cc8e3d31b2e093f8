//! Role, permission, and project administration.

use std::sync::Arc;

use chrono::Utc;
use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{
    ADMIN_ROLE_NAME, Permission, PermissionScope, PermissionTemplate, Role,
};

use crate::{PermissionRepository, ProjectRepository, RoleRepository, UserRepository};

mod permissions;
mod projects;
mod roles;

#[cfg(test)]
mod tests;

/// Application service for RBAC administration.
///
/// Every operation takes the owning project, where `None` addresses the
/// platform scope.
#[derive(Clone)]
pub struct RbacService {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl RbacService {
    /// Creates a new RBAC service from repository implementations.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            roles,
            permissions,
            projects,
            users,
        }
    }

    /// Seeds the default platform permissions and the admin role.
    ///
    /// Does nothing once any platform permission exists.
    pub async fn init(&self) -> AppResult<()> {
        if !self.permissions.list_permissions(None).await?.is_empty() {
            return Ok(());
        }

        for template in PermissionTemplate::defaults(PermissionScope::Platform) {
            self.permissions
                .create_permission(template.instantiate(None))
                .await?;
        }

        let admin_role = self
            .roles
            .find_roles(None, &[ADMIN_ROLE_NAME.to_owned()])
            .await?;
        if admin_role.is_empty() {
            self.roles
                .create_role(Role::new(
                    ADMIN_ROLE_NAME,
                    "Admin",
                    None,
                    vec![ADMIN_ROLE_NAME.to_owned()],
                ))
                .await?;
        }

        tracing::info!("seeded default platform permissions and admin role");
        Ok(())
    }

    async fn require_scope(&self, project: Option<&str>) -> AppResult<()> {
        let Some(project) = project else {
            return Ok(());
        };

        match self.projects.find_project(project).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "project '{project}' does not exist"
            ))),
        }
    }

    async fn find_permission(&self, project: Option<&str>, name: &str) -> AppResult<Permission> {
        self.permissions
            .find_permissions(project, &[name.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("permission '{name}' does not exist")))
    }

    async fn find_role(&self, project: Option<&str>, name: &str) -> AppResult<Role> {
        self.roles
            .find_roles(project, &[name.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }
}

fn touch(updated_at: &mut chrono::DateTime<Utc>) {
    *updated_at = Utc::now();
}
