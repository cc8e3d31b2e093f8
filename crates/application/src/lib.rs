//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod rbac_ports;
mod rbac_service;
mod resource_action_registry;
mod user_service;

#[cfg(test)]
mod test_support;

pub use authorization_service::{AuthorizationService, AuthorizedRequest, RequestParameters};
pub use rbac_ports::{
    CreatePermissionInput, CreateProjectInput, CreateRoleInput, CreateUserInput,
    PasswordHasher, PermissionRepository, ProjectRepository, RoleRepository,
    UpdatePermissionInput, UpdateRoleInput, UpdateUserInput, UserQuery, UserRepository,
};
pub use rbac_service::RbacService;
pub use resource_action_registry::{PermissionRequirement, ResourceActionRegistry};
pub use user_service::{LoginUserInfo, UserDetail, UserList, UserService};
