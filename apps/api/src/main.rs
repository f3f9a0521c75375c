mod ats;
mod config;
mod errors;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::history::{HistorySink, MemoryHistory, RedisHistory};
use crate::ats::AtsScanner;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Scan history: Redis when configured, otherwise in-process
    let history: Arc<dyn HistorySink> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Scan history: redis (cap {})", config.history_limit);
            Arc::new(RedisHistory::new(client, config.history_limit))
        }
        None => {
            info!("Scan history: in-memory (cap {})", config.history_limit);
            Arc::new(MemoryHistory::new(config.history_limit))
        }
    };

    let scanner = Arc::new(AtsScanner::default());
    info!(
        "Scanner ready: {} checks",
        scanner.catalogue().iter().map(|c| c.checks.len()).sum::<usize>()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        scanner,
        history,
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
