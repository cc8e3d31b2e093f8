use kubedeck_application::{CreateUserInput, UpdateUserInput, UserDetail, UserList, UserQuery};
use kubedeck_domain::{Role, User};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::timestamp;
use super::projects::ProjectResponse;

const DEFAULT_PAGE_SIZE: usize = 20;

/// API representation of a dashboard account.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub name: String,
    pub alias: String,
    pub email: Option<String>,
    pub roles: Vec<String>,
    pub disabled: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            email: value.email,
            roles: value.roles,
            disabled: value.disabled,
            created_at: timestamp(value.created_at),
            last_login_at: value.last_login_at.map(timestamp),
        }
    }
}

/// Name and alias of a role granted to a user.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-summary-response.ts"
)]
pub struct RoleSummaryResponse {
    pub name: String,
    pub alias: String,
}

impl From<Role> for RoleSummaryResponse {
    fn from(value: Role) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
        }
    }
}

/// A user with its platform roles and projects.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-detail-response.ts"
)]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub roles: Vec<RoleSummaryResponse>,
    pub projects: Vec<ProjectResponse>,
}

impl From<UserDetail> for UserDetailResponse {
    fn from(value: UserDetail) -> Self {
        Self {
            user: UserResponse::from(value.user),
            roles: value.roles.into_iter().map(RoleSummaryResponse::from).collect(),
            projects: value.projects.into_iter().map(ProjectResponse::from).collect(),
        }
    }
}

/// One page of users.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-list-response.ts"
)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

impl From<UserList> for UserListResponse {
    fn from(value: UserList) -> Self {
        Self {
            users: value.users.into_iter().map(UserResponse::from).collect(),
            total: value.total,
        }
    }
}

/// Query string of the user listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub email: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl From<ListUsersQuery> for UserQuery {
    fn from(value: ListUsersQuery) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            email: value.email,
            page: value.page,
            page_size: value.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Incoming payload for user creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            email: value.email,
            password: value.password,
            roles: value.roles,
        }
    }
}

/// Incoming payload for user updates. Omitted fields are kept.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    pub alias: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            alias: value.alias,
            email: value.email,
            password: value.password,
            roles: value.roles,
        }
    }
}
