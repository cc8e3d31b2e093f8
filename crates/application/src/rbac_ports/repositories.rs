use async_trait::async_trait;

use kubedeck_core::AppResult;
use kubedeck_domain::{Permission, Project, ProjectUser, Role, User};

/// Repository port for dashboard accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by name.
    async fn find_user(&self, name: &str) -> AppResult<Option<User>>;

    /// Lists every user ordered by name.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Persists a new user. Fails with `Conflict` when the name is taken.
    async fn create_user(&self, user: User) -> AppResult<()>;

    /// Replaces an existing user. Fails with `NotFound` when absent.
    async fn save_user(&self, user: User) -> AppResult<()>;

    /// Deletes a user. Fails with `NotFound` when absent.
    async fn delete_user(&self, name: &str) -> AppResult<()>;
}

/// Repository port for platform and project roles.
///
/// `project` is `None` for platform roles.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists roles of one scope ordered by name.
    async fn list_roles(&self, project: Option<&str>) -> AppResult<Vec<Role>>;

    /// Returns the roles of one scope whose names are in `names`.
    async fn find_roles(&self, project: Option<&str>, names: &[String]) -> AppResult<Vec<Role>>;

    /// Persists a new role. Fails with `Conflict` when the name is taken in scope.
    async fn create_role(&self, role: Role) -> AppResult<()>;

    /// Replaces an existing role. Fails with `NotFound` when absent.
    async fn save_role(&self, role: Role) -> AppResult<()>;

    /// Deletes a role. Fails with `NotFound` when absent.
    async fn delete_role(&self, project: Option<&str>, name: &str) -> AppResult<()>;
}

/// Repository port for permission policies.
///
/// `project` is `None` for platform permissions.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Lists permissions of one scope ordered by name.
    async fn list_permissions(&self, project: Option<&str>) -> AppResult<Vec<Permission>>;

    /// Returns the permissions of one scope whose names are in `names`.
    async fn find_permissions(
        &self,
        project: Option<&str>,
        names: &[String],
    ) -> AppResult<Vec<Permission>>;

    /// Persists a new permission. Fails with `Conflict` when the name is taken in scope.
    async fn create_permission(&self, permission: Permission) -> AppResult<()>;

    /// Replaces an existing permission. Fails with `NotFound` when absent.
    async fn save_permission(&self, permission: Permission) -> AppResult<()>;

    /// Deletes a permission. Fails with `NotFound` when absent.
    async fn delete_permission(&self, project: Option<&str>, name: &str) -> AppResult<()>;
}

/// Repository port for projects, memberships, and project context lookups.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by name.
    async fn find_project(&self, name: &str) -> AppResult<Option<Project>>;

    /// Lists every project ordered by name.
    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    /// Persists a new project. Fails with `Conflict` when the name is taken.
    async fn create_project(&self, project: Project) -> AppResult<()>;

    /// Finds the membership of a user in a project.
    async fn find_project_user(
        &self,
        project: &str,
        username: &str,
    ) -> AppResult<Option<ProjectUser>>;

    /// Lists every membership of a user.
    async fn list_memberships(&self, username: &str) -> AppResult<Vec<ProjectUser>>;

    /// Inserts or replaces a membership.
    async fn save_project_user(&self, member: ProjectUser) -> AppResult<()>;

    /// Removes every membership of a user.
    async fn delete_memberships(&self, username: &str) -> AppResult<()>;

    /// Returns the project owning the named application.
    async fn application_project(&self, app_name: &str) -> AppResult<Option<String>>;

    /// Returns the project owning the named environment.
    async fn environment_project(&self, env_name: &str) -> AppResult<Option<String>>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
