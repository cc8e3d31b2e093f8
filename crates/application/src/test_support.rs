use std::collections::BTreeMap;

use async_trait::async_trait;
use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{Permission, Project, ProjectUser, Role, User};
use tokio::sync::Mutex;

use crate::{
    PasswordHasher, PermissionRepository, ProjectRepository, RoleRepository, UserRepository,
};

type ScopedKey = (String, String);

fn scoped_key(project: Option<&str>, name: &str) -> ScopedKey {
    (project.unwrap_or_default().to_owned(), name.to_owned())
}

#[derive(Default)]
pub(crate) struct FakeStore {
    pub(crate) users: Mutex<BTreeMap<String, User>>,
    pub(crate) roles: Mutex<BTreeMap<ScopedKey, Role>>,
    pub(crate) permissions: Mutex<BTreeMap<ScopedKey, Permission>>,
    pub(crate) projects: Mutex<BTreeMap<String, Project>>,
    pub(crate) members: Mutex<BTreeMap<(String, String), ProjectUser>>,
    pub(crate) applications: Mutex<BTreeMap<String, String>>,
    pub(crate) environments: Mutex<BTreeMap<String, String>>,
    pub(crate) fail_permission_reads: Mutex<bool>,
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_user(&self, name: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(name).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn create_user(&self, user: User) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.name) {
            return Err(AppError::Conflict(format!("user '{}' exists", user.name)));
        }
        users.insert(user.name.clone(), user);
        Ok(())
    }

    async fn save_user(&self, user: User) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if !users.contains_key(&user.name) {
            return Err(AppError::NotFound(format!("user '{}'", user.name)));
        }
        users.insert(user.name.clone(), user);
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> AppResult<()> {
        self.users
            .lock()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("user '{name}'")))
    }
}

#[async_trait]
impl RoleRepository for FakeStore {
    async fn list_roles(&self, project: Option<&str>) -> AppResult<Vec<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .values()
            .filter(|role| role.project.as_deref() == project)
            .cloned()
            .collect())
    }

    async fn find_roles(&self, project: Option<&str>, names: &[String]) -> AppResult<Vec<Role>> {
        Ok(self
            .list_roles(project)
            .await?
            .into_iter()
            .filter(|role| names.contains(&role.name))
            .collect())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        let key = scoped_key(role.project.as_deref(), &role.name);
        let mut roles = self.roles.lock().await;
        if roles.contains_key(&key) {
            return Err(AppError::Conflict(format!("role '{}' exists", role.name)));
        }
        roles.insert(key, role);
        Ok(())
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        let key = scoped_key(role.project.as_deref(), &role.name);
        let mut roles = self.roles.lock().await;
        if !roles.contains_key(&key) {
            return Err(AppError::NotFound(format!("role '{}'", role.name)));
        }
        roles.insert(key, role);
        Ok(())
    }

    async fn delete_role(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .remove(&scoped_key(project, name))
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{name}'")))
    }
}

#[async_trait]
impl PermissionRepository for FakeStore {
    async fn list_permissions(&self, project: Option<&str>) -> AppResult<Vec<Permission>> {
        if *self.fail_permission_reads.lock().await {
            return Err(AppError::Internal("permission store unavailable".to_owned()));
        }

        Ok(self
            .permissions
            .lock()
            .await
            .values()
            .filter(|permission| permission.project.as_deref() == project)
            .cloned()
            .collect())
    }

    async fn find_permissions(
        &self,
        project: Option<&str>,
        names: &[String],
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .list_permissions(project)
            .await?
            .into_iter()
            .filter(|permission| names.contains(&permission.name))
            .collect())
    }

    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        let key = scoped_key(permission.project.as_deref(), &permission.name);
        let mut permissions = self.permissions.lock().await;
        if permissions.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "permission '{}' exists",
                permission.name
            )));
        }
        permissions.insert(key, permission);
        Ok(())
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let key = scoped_key(permission.project.as_deref(), &permission.name);
        let mut permissions = self.permissions.lock().await;
        if !permissions.contains_key(&key) {
            return Err(AppError::NotFound(format!("permission '{}'", permission.name)));
        }
        permissions.insert(key, permission);
        Ok(())
    }

    async fn delete_permission(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        self.permissions
            .lock()
            .await
            .remove(&scoped_key(project, name))
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("permission '{name}'")))
    }
}

#[async_trait]
impl ProjectRepository for FakeStore {
    async fn find_project(&self, name: &str) -> AppResult<Option<Project>> {
        Ok(self.projects.lock().await.get(name).cloned())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(self.projects.lock().await.values().cloned().collect())
    }

    async fn create_project(&self, project: Project) -> AppResult<()> {
        let mut projects = self.projects.lock().await;
        if projects.contains_key(&project.name) {
            return Err(AppError::Conflict(format!(
                "project '{}' exists",
                project.name
            )));
        }
        projects.insert(project.name.clone(), project);
        Ok(())
    }

    async fn find_project_user(
        &self,
        project: &str,
        username: &str,
    ) -> AppResult<Option<ProjectUser>> {
        Ok(self
            .members
            .lock()
            .await
            .get(&(project.to_owned(), username.to_owned()))
            .cloned())
    }

    async fn list_memberships(&self, username: &str) -> AppResult<Vec<ProjectUser>> {
        Ok(self
            .members
            .lock()
            .await
            .values()
            .filter(|member| member.username == username)
            .cloned()
            .collect())
    }

    async fn save_project_user(&self, member: ProjectUser) -> AppResult<()> {
        self.members.lock().await.insert(
            (member.project_name.clone(), member.username.clone()),
            member,
        );
        Ok(())
    }

    async fn delete_memberships(&self, username: &str) -> AppResult<()> {
        self.members
            .lock()
            .await
            .retain(|_, member| member.username != username);
        Ok(())
    }

    async fn application_project(&self, app_name: &str) -> AppResult<Option<String>> {
        Ok(self.applications.lock().await.get(app_name).cloned())
    }

    async fn environment_project(&self, env_name: &str) -> AppResult<Option<String>> {
        Ok(self.environments.lock().await.get(env_name).cloned())
    }
}

pub(crate) struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}
