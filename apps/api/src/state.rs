use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::heuristics::followup::RandomSource;
use crate::interview::sessions::SessionStore;
use crate::logbook::LogStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Pluggable submission log. CSV file by default, Postgres when configured.
    pub log_store: Arc<dyn LogStore>,
    /// Process-wide random source for follow-up draws.
    pub rng: Arc<Mutex<dyn RandomSource>>,
}

impl AppState {
    /// Runs `f` with exclusive access to the random source.
    /// The lock is never held across an await point.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}
