use std::collections::HashMap;

use async_trait::async_trait;
use kubedeck_application::{
    PermissionRepository, ProjectRepository, RoleRepository, UserRepository,
};
use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{Permission, Project, ProjectUser, Role, User};
use tokio::sync::RwLock;

mod projects;

#[cfg(test)]
mod tests;

/// Scope key of roles and permissions; the empty project is the platform.
type ScopedKey = (String, String);

fn scoped_key(project: Option<&str>, name: &str) -> ScopedKey {
    (project.unwrap_or_default().to_owned(), name.to_owned())
}

fn scope_label(project: Option<&str>) -> String {
    match project {
        Some(project) => format!("project '{project}'"),
        None => "platform scope".to_owned(),
    }
}

/// In-memory implementation of every RBAC repository port.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    users: RwLock<HashMap<String, User>>,
    roles: RwLock<HashMap<ScopedKey, Role>>,
    permissions: RwLock<HashMap<ScopedKey, Permission>>,
    projects: RwLock<HashMap<String, Project>>,
    project_users: RwLock<HashMap<(String, String), ProjectUser>>,
    applications: RwLock<HashMap<String, String>>,
    environments: RwLock<HashMap<String, String>>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRbacRepository {
    async fn find_user(&self, name: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(name).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(users)
    }

    async fn create_user(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.name) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                user.name
            )));
        }

        users.insert(user.name.clone(), user);
        Ok(())
    }

    async fn save_user(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        let Some(stored) = users.get_mut(&user.name) else {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                user.name
            )));
        };

        *stored = user;
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> AppResult<()> {
        self.users
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("user '{name}' does not exist")))
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn list_roles(&self, project: Option<&str>) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .roles
            .read()
            .await
            .values()
            .filter(|role| role.project.as_deref() == project)
            .cloned()
            .collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn find_roles(&self, project: Option<&str>, names: &[String]) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;
        Ok(names
            .iter()
            .filter_map(|name| roles.get(&scoped_key(project, name)).cloned())
            .collect())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        let key = scoped_key(role.project.as_deref(), &role.name);
        let mut roles = self.roles.write().await;
        if roles.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists in {}",
                role.name,
                scope_label(role.project.as_deref())
            )));
        }

        roles.insert(key, role);
        Ok(())
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        let key = scoped_key(role.project.as_deref(), &role.name);
        let mut roles = self.roles.write().await;
        let Some(stored) = roles.get_mut(&key) else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist in {}",
                role.name,
                scope_label(role.project.as_deref())
            )));
        };

        *stored = role;
        Ok(())
    }

    async fn delete_role(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        self.roles
            .write()
            .await
            .remove(&scoped_key(project, name))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "role '{name}' does not exist in {}",
                    scope_label(project)
                ))
            })
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn list_permissions(&self, project: Option<&str>) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> = self
            .permissions
            .read()
            .await
            .values()
            .filter(|permission| permission.project.as_deref() == project)
            .cloned()
            .collect();
        permissions.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(permissions)
    }

    async fn find_permissions(
        &self,
        project: Option<&str>,
        names: &[String],
    ) -> AppResult<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        Ok(names
            .iter()
            .filter_map(|name| permissions.get(&scoped_key(project, name)).cloned())
            .collect())
    }

    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        let key = scoped_key(permission.project.as_deref(), &permission.name);
        let mut permissions = self.permissions.write().await;
        if permissions.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists in {}",
                permission.name,
                scope_label(permission.project.as_deref())
            )));
        }

        permissions.insert(key, permission);
        Ok(())
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let key = scoped_key(permission.project.as_deref(), &permission.name);
        let mut permissions = self.permissions.write().await;
        let Some(stored) = permissions.get_mut(&key) else {
            return Err(AppError::NotFound(format!(
                "permission '{}' does not exist in {}",
                permission.name,
                scope_label(permission.project.as_deref())
            )));
        };

        *stored = permission;
        Ok(())
    }

    async fn delete_permission(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        self.permissions
            .write()
            .await
            .remove(&scoped_key(project, name))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "permission '{name}' does not exist in {}",
                    scope_label(project)
                ))
            })
    }
}
