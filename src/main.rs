use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;

use config::settings::AppConfig;
use infrastructure::db::pool;
use modules::genre::repository::GenreRepository;
use modules::movie::repository::MovieRepository;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Failed to load configuration")?;

    let db = pool::connect_to_db(&config.database_url, config.db_max_connections).await?;
    pool::run_migrations(&db).await?;

    let state = AppState::new(
        &config,
        Arc::new(GenreRepository::new(db.clone())),
        Arc::new(MovieRepository::new(db)),
    );

    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
