use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use kubedeck_application::AuthorizedRequest;

use crate::dto::{CreateProjectRequest, ProjectResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_projects_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let projects = state
        .rbac_service
        .list_projects()
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(projects))
}

pub async fn create_project_handler(
    State(state): State<AppState>,
    Extension(authorized): Extension<AuthorizedRequest>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let project = state.rbac_service.create_project(payload.into()).await?;

    tracing::info!(
        user = %authorized.username,
        project = %project.name,
        "project created"
    );

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}
