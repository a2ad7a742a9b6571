#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::fallback;
use crate::api::router;
use crate::config::Config;
use crate::storage::Database;
use crate::storage::DatabaseConfig;

mod api;
mod config;
mod fields;
mod graceful_shutdown;
mod mutations;
mod notes;
mod ownership;
mod password;
mod query;
mod stats;
mod storage;
#[cfg(test)]
mod tests;
mod users;

const DEFAULT_RUST_LOG: &str = "jotter=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;
    let jwt_keys = JwtKeys::new(config.jwt_secret.as_bytes(), config.token_expires_in);

    let app = setup_app(DatabaseConfig::DetectConfig, jwt_keys).await?;

    let listener = TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if the storage can not be set up
pub async fn setup_app(database_config: DatabaseConfig, jwt_keys: JwtKeys) -> Result<Router> {
    let database = Database::from_config(database_config).await?;

    Ok(create_router(database, jwt_keys))
}

/// Create the router for Jotter
fn create_router(database: Database, jwt_keys: JwtKeys) -> Router {
    Router::new()
        .nest("/api", router())
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(database))
        .layer(Extension(jwt_keys))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
