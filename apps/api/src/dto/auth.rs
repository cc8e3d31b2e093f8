use std::collections::BTreeMap;

use kubedeck_application::LoginUserInfo;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::projects::ProjectResponse;
use super::rbac::PermissionResponse;
use super::users::UserResponse;

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub user: UserResponse,
}

/// The logged-in user together with every policy granted to them.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-user-info-response.ts"
)]
pub struct LoginUserInfoResponse {
    pub user: UserResponse,
    pub projects: Vec<ProjectResponse>,
    pub platform_permissions: Vec<PermissionResponse>,
    pub project_permissions: BTreeMap<String, Vec<PermissionResponse>>,
}

impl From<LoginUserInfo> for LoginUserInfoResponse {
    fn from(value: LoginUserInfo) -> Self {
        Self {
            user: UserResponse::from(value.user),
            projects: value.projects.into_iter().map(ProjectResponse::from).collect(),
            platform_permissions: value
                .platform_permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
            project_permissions: value
                .project_permissions
                .into_iter()
                .map(|(project, permissions)| {
                    (
                        project,
                        permissions.into_iter().map(PermissionResponse::from).collect(),
                    )
                })
                .collect(),
        }
    }
}
