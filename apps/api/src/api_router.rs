use std::sync::Arc;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, delete, get, post, put};
use kubedeck_core::AppResult;
use tower_http::trace::TraceLayer;

use crate::middleware::{self, PermissionGate};
use crate::state::AppState;
use crate::{auth, handlers};

mod cors;


/// Gates `method_router` on `actions` over `resource`.
///
/// Registration resolves the resource against the platform schema, so an
/// unknown or ambiguous resource aborts router assembly.
fn secured(
    state: &AppState,
    resource: &str,
    actions: &[&str],
    method_router: MethodRouter<AppState>,
) -> AppResult<MethodRouter<AppState>> {
    let requirement = state.resource_actions.register(resource, actions)?;
    let gate = PermissionGate {
        state: state.clone(),
        requirement: Arc::new(requirement),
    };

    Ok(method_router.route_layer(from_fn_with_state(gate, middleware::check_permission)))
}

fn user_routes(state: &AppState) -> AppResult<Router<AppState>> {
    Ok(Router::new()
        .route(
            "/api/v1/users",
            secured(state, "user", &["list"], get(handlers::users::list_users_handler))?.merge(
                secured(
                    state,
                    "user",
                    &["create"],
                    post(handlers::users::create_user_handler),
                )?,
            ),
        )
        .route(
            "/api/v1/users/{userName}",
            secured(
                state,
                "user",
                &["detail"],
                get(handlers::users::get_user_handler),
            )?
            .merge(secured(
                state,
                "user",
                &["update"],
                put(handlers::users::update_user_handler),
            )?)
            .merge(secured(
                state,
                "user",
                &["delete"],
                delete(handlers::users::delete_user_handler),
            )?),
        )
        .route(
            "/api/v1/users/{userName}/disable",
            secured(
                state,
                "user",
                &["disable"],
                post(handlers::users::disable_user_handler),
            )?,
        )
        .route(
            "/api/v1/users/{userName}/enable",
            secured(
                state,
                "user",
                &["enable"],
                post(handlers::users::enable_user_handler),
            )?,
        ))
}

fn platform_rbac_routes(state: &AppState) -> AppResult<Router<AppState>> {
    Ok(Router::new()
        .route(
            "/api/v1/roles",
            secured(state, "role", &["list"], get(handlers::roles::list_roles_handler))?.merge(
                secured(
                    state,
                    "role",
                    &["create"],
                    post(handlers::roles::create_role_handler),
                )?,
            ),
        )
        .route(
            "/api/v1/roles/{roleName}",
            secured(
                state,
                "role",
                &["update"],
                put(handlers::roles::update_role_handler),
            )?
            .merge(secured(
                state,
                "role",
                &["delete"],
                delete(handlers::roles::delete_role_handler),
            )?),
        )
        .route(
            "/api/v1/permissions",
            secured(
                state,
                "permission",
                &["list"],
                get(handlers::permissions::list_permissions_handler),
            )?
            .merge(secured(
                state,
                "permission",
                &["create"],
                post(handlers::permissions::create_permission_handler),
            )?),
        )
        .route(
            "/api/v1/permissions/{permissionName}",
            secured(
                state,
                "permission",
                &["update"],
                put(handlers::permissions::update_permission_handler),
            )?
            .merge(secured(
                state,
                "permission",
                &["delete"],
                delete(handlers::permissions::delete_permission_handler),
            )?),
        )
        .route(
            "/api/v1/permission_templates",
            secured(
                state,
                "permission",
                &["list"],
                get(handlers::permissions::list_permission_templates_handler),
            )?,
        )
        .route(
            "/api/v1/resource_actions",
            secured(
                state,
                "permission",
                &["list"],
                get(handlers::permissions::list_resource_actions_handler),
            )?,
        ))
}

fn project_routes(state: &AppState) -> AppResult<Router<AppState>> {
    Ok(Router::new()
        .route(
            "/api/v1/projects",
            secured(
                state,
                "project",
                &["list"],
                get(handlers::projects::list_projects_handler),
            )?
            .merge(secured(
                state,
                "project",
                &["create"],
                post(handlers::projects::create_project_handler),
            )?),
        )
        .route(
            "/api/v1/projects/{projectName}/roles",
            secured(
                state,
                "project/role",
                &["list"],
                get(handlers::roles::list_project_roles_handler),
            )?
            .merge(secured(
                state,
                "project/role",
                &["create"],
                post(handlers::roles::create_project_role_handler),
            )?),
        )
        .route(
            "/api/v1/projects/{projectName}/roles/{roleName}",
            secured(
                state,
                "project/role",
                &["update"],
                put(handlers::roles::update_project_role_handler),
            )?
            .merge(secured(
                state,
                "project/role",
                &["delete"],
                delete(handlers::roles::delete_project_role_handler),
            )?),
        )
        .route(
            "/api/v1/projects/{projectName}/permissions",
            secured(
                state,
                "project/permission",
                &["list"],
                get(handlers::permissions::list_project_permissions_handler),
            )?
            .merge(secured(
                state,
                "project/permission",
                &["create"],
                post(handlers::permissions::create_project_permission_handler),
            )?),
        )
        .route(
            "/api/v1/projects/{projectName}/permissions/{permissionName}",
            secured(
                state,
                "project/permission",
                &["delete"],
                delete(handlers::permissions::delete_project_permission_handler),
            )?,
        ))
}

/// Assembles every route. The caller adds the session layer.
pub fn build_router(app_state: AppState, frontend_url: &str) -> AppResult<Router> {
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me_handler))
        .merge(user_routes(&app_state)?)
        .merge(platform_rbac_routes(&app_state)?)
        .merge(project_routes(&app_state)?)
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/v1/auth/login", post(auth::login_handler))
        .route("/api/v1/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
