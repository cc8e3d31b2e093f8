use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::{
    CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserDetailResponse, UserListResponse,
    UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let users = state.user_service.list_users(&query.into()).await?;

    Ok(Json(UserListResponse::from(users)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create_user(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> ApiResult<Json<UserDetailResponse>> {
    let detail = state.user_service.detail_user(&user_name).await?;

    Ok(Json(UserDetailResponse::from(detail)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(&user_name, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> ApiResult<StatusCode> {
    state.user_service.delete_user(&user_name).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn disable_user_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.disable_user(&user_name).await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn enable_user_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.enable_user(&user_name).await?;

    Ok(Json(UserResponse::from(user)))
}
