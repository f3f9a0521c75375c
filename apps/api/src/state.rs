use std::sync::Arc;

use crate::ats::history::HistorySink;
use crate::ats::AtsScanner;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless and deterministic. Shared across blocking scan tasks.
    pub scanner: Arc<AtsScanner>,
    /// Redis-backed when REDIS_URL is set, in-memory otherwise.
    pub history: Arc<dyn HistorySink>,
}
