use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use kubedeck_application::{PermissionRequirement, RequestParameters};
use kubedeck_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// State of one route's permission check.
#[derive(Clone)]
pub struct PermissionGate {
    pub state: AppState,
    pub requirement: Arc<PermissionRequirement>,
}

/// Path and query parameters of the request under authorization.
struct HttpRequestParameters {
    path: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl RequestParameters for HttpRequestParameters {
    fn path_param(&self, name: &str) -> String {
        self.path.get(name).cloned().unwrap_or_default()
    }

    fn query_param(&self, name: &str) -> String {
        self.query.get(name).cloned().unwrap_or_default()
    }
}

pub async fn check_permission(
    State(gate): State<PermissionGate>,
    Path(path): Path<HashMap<String, String>>,
    Query(query): Query<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let parameters = HttpRequestParameters { path, query };
    let identity = request.extensions().get::<UserIdentity>().cloned();

    let authorized = gate
        .state
        .authorization_service
        .authorize(&gate.requirement, identity.as_ref(), &parameters)
        .await?;

    request.extensions_mut().insert(authorized);
    Ok(next.run(request).await)
}
