use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::logbook::export::write_csv;
use crate::logbook::LogStore;
use crate::models::submission::LogRow;

/// Flat-file log. Each append re-reads the file, adds the row and rewrites it with
/// the current header, so files written by an older schema pick up new columns.
///
/// The mutex only orders writers inside this process. Other processes writing the
/// same file are not coordinated; the last writer wins.
pub struct CsvLogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads every row; a missing file is an empty log.
fn read_rows(path: &Path) -> Result<Vec<LogRow>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<Result<Vec<LogRow>, _>>()?;
    Ok(rows)
}

fn append_row(path: &Path, row: LogRow) -> Result<usize, AppError> {
    let mut rows = read_rows(path)?;
    rows.push(row);
    let bytes = write_csv(Vec::new(), &rows)?;
    fs::write(path, bytes)?;
    Ok(rows.len())
}

async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow!("log task failed: {e}")))?
}

#[async_trait]
impl LogStore for CsvLogStore {
    async fn append(&self, row: &LogRow) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let row = row.clone();
        let total = run_blocking(move || append_row(&path, row)).await?;
        info!("Appended submission to {} ({total} rows)", self.path.display());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<LogRow>, AppError> {
        let path = self.path.clone();
        let rows = run_blocking(move || read_rows(&path)).await?;
        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn backend_name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submission::LOG_COLUMNS;

    fn sample(participant: &str) -> LogRow {
        LogRow {
            timestamp: "2025-03-01T12:00:00+00:00".to_string(),
            participant_id: participant.to_string(),
            scenario: "Scenario 1 – Collaboration (Team Conflict)".to_string(),
            answer_text: "We met daily,\nand \"agreed\" on scope.".to_string(),
            fairness_score: Some(5),
            flag_unfair: true,
            accept_ai: "No".to_string(),
            ..LogRow::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLogStore::new(dir.path().join("none.csv"));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_read_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLogStore::new(dir.path().join("logs.csv"));

        store.append(&sample("P01")).await.unwrap();
        store.append(&sample("P02")).await.unwrap();

        let rows = store.read_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], sample("P01"));
        assert_eq!(rows[1].participant_id, "P02");
    }

    #[tokio::test]
    async fn test_file_starts_with_full_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLogStore::new(dir.path().join("logs.csv"));
        store.append(&sample("P01")).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, LOG_COLUMNS.join(","));
    }

    #[tokio::test]
    async fn test_older_schema_missing_columns_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.csv");
        std::fs::write(
            &path,
            "timestamp,participant_id,scenario,fairness_score,accept_ai\n\
             2024-11-02T10:00:00,P09,Scenario 2 – Integrity (Ethical Dilemma),4,Yes\n",
        )
        .unwrap();

        let store = CsvLogStore::new(&path);
        let rows = store.read_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].participant_id, "P09");
        assert_eq!(rows[0].fairness_score, Some(4));
        assert_eq!(rows[0].trust_score, None);
        assert!(rows[0].neutralized_question.is_empty());

        // Appending rewrites the file with the current header.
        store.append(&sample("P10")).await.unwrap();
        let rows = store.read_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].participant_id, "P09");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("timestamp,participant_id,scenario,scenario_prompt_used"));
    }

    #[tokio::test]
    async fn test_blank_cells_and_pandas_values_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pandas.csv");
        std::fs::write(
            &path,
            "timestamp,participant_id,fairness_score,flag_unfair,accept_ai\n\
             2024-11-02T10:00:00,P09,,,\n\
             2024-11-02T10:05:00,P10,4.0,True,Yes\n",
        )
        .unwrap();

        let store = CsvLogStore::new(&path);
        let rows = store.read_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].participant_id, "P09");
        assert_eq!(rows[0].fairness_score, None);
        assert!(!rows[0].flag_unfair);
        assert!(rows[0].accept_ai.is_empty());
        assert_eq!(rows[1].fairness_score, Some(4));
        assert!(rows[1].flag_unfair);
        assert_eq!(rows[1].accept_ai, "Yes");

        // The log keeps accepting submissions after reading such rows.
        store.append(&sample("P11")).await.unwrap();
        let rows = store.read_all().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].fairness_score, Some(4));
        assert_eq!(rows[2].participant_id, "P11");
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(CsvLogStore::new("x.csv").backend_name(), "csv");
    }
}
