mod config;
mod errors;
mod heuristics;
mod interview;
mod logbook;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::heuristics::followup::EntropySource;
use crate::interview::sessions::SessionStore;
use crate::logbook::csv_store::CsvLogStore;
use crate::logbook::pg_store::PgLogStore;
use crate::logbook::LogStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview Transparency API v{}", env!("CARGO_PKG_VERSION"));

    // Submission log: Postgres when configured, CSV file otherwise
    let log_store: Arc<dyn LogStore> = match &config.log_database_url {
        Some(url) => Arc::new(PgLogStore::connect(url).await?),
        None => {
            let store = CsvLogStore::new(&config.log_file);
            info!("CSV log file: {}", store.path().display());
            Arc::new(store)
        }
    };
    info!("Submission log backend: {}", log_store.backend_name());

    if config.admin_password.is_some() {
        info!("Researcher view enabled");
    } else {
        info!("Researcher view disabled (ADMIN_PASSWORD not set)");
    }

    let sessions = SessionStore::new();
    sessions.spawn_sweeper(config.session_ttl);
    info!(
        "Idle sessions expire after {} minutes",
        config.session_ttl.as_secs() / 60
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        sessions,
        log_store,
        rng: Arc::new(Mutex::new(EntropySource::new())),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
