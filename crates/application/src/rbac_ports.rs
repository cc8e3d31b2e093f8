mod inputs;
mod repositories;

pub use inputs::{
    CreatePermissionInput, CreateProjectInput, CreateRoleInput, CreateUserInput,
    UpdatePermissionInput, UpdateRoleInput, UpdateUserInput, UserQuery,
};
pub use repositories::{
    PasswordHasher, PermissionRepository, ProjectRepository, RoleRepository, UserRepository,
};
