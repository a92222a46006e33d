//! # DocPortal API Server
//!
//! Serves the document portal's HTTP API: subjects, lessons, documents
//! stored in PostgreSQL, per-subject zip downloads and admin sign-in.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/docportal \
//! SESSION_SECRET=$(openssl rand -hex 32) \
//! cargo run -p docportal-api
//! ```

use anyhow::Context;
use docportal_api::{
    app::{build_router, AppState},
    config::Config,
    telemetry::{init_tracing, LogFormat},
};
use docportal_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before LOG_FORMAT is read
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env())?;

    tracing::info!("DocPortal API v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::new(config.database.url.clone())
    })
    .await
    .context("Failed to connect to the database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!(address = %bind_address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
