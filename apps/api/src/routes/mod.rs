pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // ATS analysis API
        .route("/api/v1/ats/checks", get(handlers::handle_checks))
        .route("/api/v1/ats/scan", post(handlers::handle_scan))
        .route("/api/v1/ats/quick-scan", post(handlers::handle_quick_scan))
        .route("/api/v1/ats/compare", post(handlers::handle_compare))
        .route("/api/v1/ats/path", post(handlers::handle_path_to_score))
        .route("/api/v1/ats/export", post(handlers::handle_export))
        .route("/api/v1/ats/history", get(handlers::handle_history))
        .with_state(state)
}
