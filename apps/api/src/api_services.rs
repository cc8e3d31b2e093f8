use std::sync::Arc;

use kubedeck_application::{
    AuthorizationService, PasswordHasher, PermissionRepository, ProjectRepository,
    RbacService, ResourceActionRegistry, RoleRepository, UserRepository, UserService,
};
use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::ResourceSchemaRegistry;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub async fn connect_database(config: &ApiConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

pub async fn build_session_layer(
    pool: PgPool,
    config: &ApiConfig,
) -> AppResult<SessionManagerLayer<PostgresStore>> {
    let session_store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24))))
}

/// Wires every service onto one store implementing all RBAC ports.
pub fn build_app_state<R>(
    repository: Arc<R>,
    password_hasher: Arc<dyn PasswordHasher>,
) -> AppResult<AppState>
where
    R: UserRepository + RoleRepository + PermissionRepository + ProjectRepository + 'static,
{
    let authorization_service = AuthorizationService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        repository.clone(),
    );
    let rbac_service = RbacService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        repository.clone(),
    );
    let user_service = UserService::new(
        repository.clone(),
        repository.clone(),
        repository,
        password_hasher,
        authorization_service.clone(),
    );
    let resource_actions = Arc::new(ResourceActionRegistry::new(
        ResourceSchemaRegistry::platform()?,
    ));

    Ok(AppState {
        authorization_service,
        rbac_service,
        user_service,
        resource_actions,
    })
}

/// Seeds the default platform policies and the administrator account.
pub async fn initialize_defaults(state: &AppState, admin_password: &str) -> AppResult<()> {
    state.rbac_service.init().await?;
    state.user_service.init(admin_password).await?;
    tracing::info!("default roles and administrator account are in place");
    Ok(())
}
