//! Submission log: append-only storage for finished interview sessions.
//!
//! The rest of the service only sees `LogStore`. `AppState` holds an
//! `Arc<dyn LogStore>`, chosen at startup from config.

pub mod csv_store;
pub mod export;
pub mod handlers;
pub mod pg_store;
pub mod summary;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::submission::LogRow;

/// Append-only store of submitted rows. Rows come back in insertion order.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn append(&self, row: &LogRow) -> Result<(), AppError>;

    async fn read_all(&self) -> Result<Vec<LogRow>, AppError>;

    /// "csv" or "postgres", for startup logs.
    fn backend_name(&self) -> &'static str;
}
