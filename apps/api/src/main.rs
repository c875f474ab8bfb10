//! SIKA permit-to-work API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use sika_core::AppError;
use tracing::info;

use crate::api_config::{ApiCommand, ApiConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let pool =
        api_services::connect_and_migrate(&config.database_url, config.database_max_connections)
            .await?;

    match config.command {
        ApiCommand::Migrate => {
            info!("database migrations applied successfully");
            return Ok(());
        }
        ApiCommand::Seed => return dev_seed::run(pool, &config).await,
        ApiCommand::Serve => {}
    }

    let session_layer =
        api_services::build_postgres_session_layer(pool.clone(), config.cookie_secure).await?;
    let app_state = api_services::build_app_state(pool, &config);
    let app = api_router::build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "sika api listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
