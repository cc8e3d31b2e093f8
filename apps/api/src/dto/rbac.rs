use kubedeck_application::{
    CreatePermissionInput, CreateRoleInput, UpdatePermissionInput, UpdateRoleInput,
};
use kubedeck_domain::{Permission, PermissionTemplate, Role};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::timestamp;

/// API representation of a platform or project role.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub name: String,
    pub alias: String,
    pub project: Option<String>,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            project: value.project,
            permissions: value.permissions,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    pub permissions: Vec<String>,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            permissions: value.permissions,
        }
    }
}

/// Incoming payload for role updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub alias: String,
    pub permissions: Vec<String>,
}

impl From<UpdateRoleRequest> for UpdateRoleInput {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            alias: value.alias,
            permissions: value.permissions,
        }
    }
}

/// API representation of a permission policy.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub name: String,
    pub alias: String,
    pub project: Option<String>,
    pub resources: Vec<String>,
    pub actions: Vec<String>,
    pub effect: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            project: value.project,
            resources: value.resources,
            actions: value.actions,
            effect: value.effect.to_string(),
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

/// Incoming payload for permission creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    pub resources: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    pub effect: Option<String>,
}

impl From<CreatePermissionRequest> for CreatePermissionInput {
    fn from(value: CreatePermissionRequest) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            resources: value.resources,
            actions: value.actions,
            effect: value.effect,
        }
    }
}

/// Incoming payload for permission updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-request.ts"
)]
pub struct UpdatePermissionRequest {
    #[serde(default)]
    pub alias: String,
    pub resources: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    pub effect: Option<String>,
}

impl From<UpdatePermissionRequest> for UpdatePermissionInput {
    fn from(value: UpdatePermissionRequest) -> Self {
        Self {
            alias: value.alias,
            resources: value.resources,
            actions: value.actions,
            effect: value.effect,
        }
    }
}

/// API representation of a default permission template.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-template-response.ts"
)]
pub struct PermissionTemplateResponse {
    pub name: String,
    pub alias: String,
    pub resources: Vec<String>,
    pub actions: Vec<String>,
    pub effect: String,
    pub scope: String,
}

impl From<&PermissionTemplate> for PermissionTemplateResponse {
    fn from(value: &PermissionTemplate) -> Self {
        Self {
            name: value.name.to_owned(),
            alias: value.alias.to_owned(),
            resources: value.resources_for(None),
            actions: value
                .actions
                .iter()
                .map(|action| (*action).to_owned())
                .collect(),
            effect: value.effect.to_string(),
            scope: value.scope.as_str().to_owned(),
        }
    }
}

/// Query string of the permission template listing.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionTemplatesQuery {
    pub scope: Option<String>,
}

/// Actions an endpoint family is gated on for one resource.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resource-actions-response.ts"
)]
pub struct ResourceActionsResponse {
    pub resource: String,
    pub actions: Vec<String>,
}
