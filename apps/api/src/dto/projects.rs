use kubedeck_application::CreateProjectInput;
use kubedeck_domain::Project;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::timestamp;

/// API representation of a project.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/project-response.ts"
)]
pub struct ProjectResponse {
    pub name: String,
    pub alias: String,
    pub owner: Option<String>,
    pub description: String,
    pub created_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(value: Project) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            owner: value.owner,
            description: value.description,
            created_at: timestamp(value.created_at),
        }
    }
}

/// Incoming payload for project creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-project-request.ts"
)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    pub owner: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<CreateProjectRequest> for CreateProjectInput {
    fn from(value: CreateProjectRequest) -> Self {
        Self {
            name: value.name,
            alias: value.alias,
            owner: value.owner,
            description: value.description,
        }
    }
}
