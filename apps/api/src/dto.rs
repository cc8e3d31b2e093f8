mod auth;
mod common;
mod projects;
mod rbac;
mod users;

pub use auth::{LoginRequest, LoginResponse, LoginUserInfoResponse};
pub use common::HealthResponse;
pub use projects::{CreateProjectRequest, ProjectResponse};
pub use rbac::{
    CreatePermissionRequest, CreateRoleRequest, PermissionResponse, PermissionTemplateResponse,
    PermissionTemplatesQuery, ResourceActionsResponse, RoleResponse, UpdatePermissionRequest,
    UpdateRoleRequest,
};
pub use users::{
    CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserDetailResponse, UserListResponse,
    UserResponse,
};
