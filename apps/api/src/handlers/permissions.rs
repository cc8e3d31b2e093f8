use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kubedeck_domain::PermissionScope;

use crate::dto::{
    CreatePermissionRequest, PermissionResponse, PermissionTemplateResponse,
    PermissionTemplatesQuery, ResourceActionsResponse, UpdatePermissionRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

async fn list_permissions(
    state: &AppState,
    project: Option<&str>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .rbac_service
        .list_permissions(project)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

async fn create_permission(
    state: &AppState,
    project: Option<&str>,
    payload: CreatePermissionRequest,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .rbac_service
        .create_permission(project, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    list_permissions(&state, None).await
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    create_permission(&state, None, payload).await
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Path(permission_name): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .rbac_service
        .update_permission(None, &permission_name, payload.into())
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Path(permission_name): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .rbac_service
        .delete_permission(None, &permission_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_permission_templates_handler(
    State(state): State<AppState>,
    Query(query): Query<PermissionTemplatesQuery>,
) -> ApiResult<Json<Vec<PermissionTemplateResponse>>> {
    let scope = match query.scope.as_deref() {
        Some(scope) => scope.parse::<PermissionScope>()?,
        None => PermissionScope::Platform,
    };
    let templates = state
        .rbac_service
        .list_permission_templates(scope)
        .iter()
        .map(PermissionTemplateResponse::from)
        .collect();

    Ok(Json(templates))
}

pub async fn list_resource_actions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ResourceActionsResponse>>> {
    let registered = state
        .resource_actions
        .snapshot()?
        .into_iter()
        .map(|(resource, actions)| ResourceActionsResponse { resource, actions })
        .collect();

    Ok(Json(registered))
}

pub async fn list_project_permissions_handler(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    list_permissions(&state, Some(&project_name)).await
}

pub async fn create_project_permission_handler(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    create_permission(&state, Some(&project_name), payload).await
}

pub async fn delete_project_permission_handler(
    State(state): State<AppState>,
    Path((project_name, permission_name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .rbac_service
        .delete_permission(Some(&project_name), &permission_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
