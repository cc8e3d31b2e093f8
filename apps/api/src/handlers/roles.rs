use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};
use crate::error::ApiResult;
use crate::state::AppState;

async fn list_roles(state: &AppState, project: Option<&str>) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .rbac_service
        .list_roles(project)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

async fn create_role(
    state: &AppState,
    project: Option<&str>,
    payload: CreateRoleRequest,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .rbac_service
        .create_role(project, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

async fn update_role(
    state: &AppState,
    project: Option<&str>,
    role_name: &str,
    payload: UpdateRoleRequest,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .rbac_service
        .update_role(project, role_name, payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    list_roles(&state, None).await
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    create_role(&state, None, payload).await
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    update_role(&state, None, &role_name, payload).await
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
) -> ApiResult<StatusCode> {
    state.rbac_service.delete_role(None, &role_name).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_project_roles_handler(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    list_roles(&state, Some(&project_name)).await
}

pub async fn create_project_role_handler(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    create_role(&state, Some(&project_name), payload).await
}

pub async fn update_project_role_handler(
    State(state): State<AppState>,
    Path((project_name, role_name)): Path<(String, String)>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    update_role(&state, Some(&project_name), &role_name, payload).await
}

pub async fn delete_project_role_handler(
    State(state): State<AppState>,
    Path((project_name, role_name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .rbac_service
        .delete_role(Some(&project_name), &role_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
