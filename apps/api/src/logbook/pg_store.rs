use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::logbook::LogStore;
use crate::models::submission::LogRow;

/// Rows are stored whole as JSONB, so schema changes need no migration and older
/// rows read back with defaults for the columns they lack.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS interview_logs (
        id         BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        row_data   JSONB NOT NULL
    )
"#;

/// Postgres-backed log, used when `LOG_DATABASE_URL` is set.
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    /// Connects and creates the log table if it does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to submission log database...");
        // One row per submission; a few connections are plenty.
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await
            .context("could not connect to LOG_DATABASE_URL")?;
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        info!("interview_logs table ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn append(&self, row: &LogRow) -> Result<(), AppError> {
        // Append-only: rows are never updated or deleted.
        sqlx::query("INSERT INTO interview_logs (row_data) VALUES ($1)")
            .bind(Json(row))
            .execute(&self.pool)
            .await?;
        info!("Appended submission for scenario '{}'", row.scenario);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<LogRow>, AppError> {
        let rows: Vec<(Json<LogRow>,)> =
            sqlx::query_as("SELECT row_data FROM interview_logs ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(Json(row),)| row).collect())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
