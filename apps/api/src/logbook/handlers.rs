//! Axum route handlers for the researcher view.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use tracing::warn;

use crate::config::Config;
use crate::errors::AppError;
use crate::logbook::export::export_csv;
use crate::logbook::summary::{summarize, LogSummary};
use crate::state::AppState;

/// Header carrying the shared researcher secret.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Checks the shared secret. With no `ADMIN_PASSWORD` configured the view does not exist.
fn authorize(config: &Config, headers: &HeaderMap) -> Result<(), AppError> {
    let expected = config.admin_password.as_deref().ok_or_else(|| {
        AppError::NotFound(
            "Researcher view is disabled. Set ADMIN_PASSWORD on the server to enable it."
                .to_string(),
        )
    })?;

    match headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(supplied) if supplied == expected => Ok(()),
        Some(_) => {
            warn!("Rejected researcher view request: incorrect password");
            Err(AppError::Unauthorized)
        }
        None => Err(AppError::Unauthorized),
    }
}

/// GET /api/v1/admin/summary
///
/// Total submissions, unique participant ids and per-scenario counts.
pub async fn handle_admin_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogSummary>, AppError> {
    authorize(&state.config, &headers)?;
    let rows = state.log_store.read_all().await?;
    Ok(Json(summarize(&rows)))
}

/// GET /api/v1/admin/logs.csv
///
/// The whole log re-exported as CSV.
pub async fn handle_admin_export(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state.config, &headers)?;
    let rows = state.log_store.read_all().await?;
    let body = Bytes::from(export_csv(&rows)?);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"interview_logs.csv\"",
            ),
        ],
        body,
    ))
}
