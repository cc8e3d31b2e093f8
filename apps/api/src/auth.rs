use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use kubedeck_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::{LoginRequest, LoginResponse, LoginUserInfoResponse, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "user_identity";

/// POST /api/v1/auth/login - Start a session with username and password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .user_service
        .login(payload.username.trim(), &payload.password)
        .await?;
    let identity = UserIdentity::new(user.name.clone(), user.alias.clone());

    session.cycle_id().await.map_err(|error| {
        AppError::Internal(format!("failed to cycle session id: {error}"))
    })?;
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    tracing::info!(user = %identity.username(), "user logged in");

    Ok(Json(LoginResponse {
        user: UserResponse::from(user),
    }))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<LoginUserInfoResponse>> {
    let info = state
        .user_service
        .login_user_info(identity.username())
        .await?;

    Ok(Json(LoginUserInfoResponse::from(info)))
}
