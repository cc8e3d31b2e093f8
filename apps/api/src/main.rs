//! Kubedeck API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use kubedeck_core::AppError;
use kubedeck_infrastructure::{Argon2PasswordHasher, PostgresRbacRepository};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = api_services::connect_database(&config).await?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_layer = api_services::build_session_layer(pool.clone(), &config).await?;

    let repository = Arc::new(PostgresRbacRepository::new(pool));
    let app_state =
        api_services::build_app_state(repository, Arc::new(Argon2PasswordHasher::new()))?;
    api_services::initialize_defaults(&app_state, &config.admin_initial_password).await?;

    let app = api_router::build_router(app_state, &config.frontend_url)?.layer(session_layer);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "kubedeck-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
