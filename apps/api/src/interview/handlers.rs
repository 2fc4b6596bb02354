//! Axum route handlers for the interview wizard.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::heuristics::scenarios::{Scenario, SCENARIOS};
use crate::heuristics::values::Category;
use crate::interview::steps::{
    choose_scenario, generate_alternative, give_consent, refresh_followup, save_followup_answer,
    save_response, save_resume, set_participant_id, submit_feedback, FeedbackForm, StepState,
};
use crate::logbook::export::render_summary;
use crate::models::submission::LogRow;
use crate::state::AppState;

const TOTAL_STEPS: u8 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub participant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    pub participant_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub scenario: String,
    /// Replaces the catalog prompt when given.
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseRequest {
    pub answer_text: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowupAnswerRequest {
    pub followup_answer_text: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub step: u8,
    pub total_steps: u8,
    pub state: StepState,
}

impl SessionResponse {
    fn new(session_id: Uuid, state: StepState) -> Self {
        Self {
            session_id,
            step: state.active_step.number(),
            total_steps: TOTAL_STEPS,
            state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub session: SessionResponse,
    pub row: LogRow,
    pub summary_url: String,
}

#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: &'static [Scenario],
    pub values: Vec<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/scenarios
pub async fn handle_list_scenarios() -> Json<ScenariosResponse> {
    Json(ScenariosResponse {
        scenarios: &SCENARIOS,
        values: Category::ALL.iter().map(|c| c.name()).collect(),
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let initial = match req.participant_id.as_deref() {
        Some(id) => set_participant_id(&StepState::default(), id),
        None => StepState::default(),
    };
    let id = state.sessions.create(initial.clone()).await;
    info!(
        "Created interview session {id} ({} active)",
        state.sessions.len().await
    );
    Ok((StatusCode::CREATED, Json(SessionResponse::new(id, initial))))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let current = state.sessions.get(id).await?;
    Ok(Json(SessionResponse::new(id, current)))
}

/// DELETE /api/v1/sessions/:id
///
/// Resets the session; the participant starts again with a new one.
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!("Reset interview session {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/consent
pub async fn handle_consent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state.sessions.advance(id, |s| Ok(give_consent(s))).await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// PUT /api/v1/sessions/:id/participant
pub async fn handle_set_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ParticipantRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| Ok(set_participant_id(s, &req.participant_id)))
        .await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// PUT /api/v1/sessions/:id/resume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResumeRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| save_resume(s, &req.resume_text))
        .await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// PUT /api/v1/sessions/:id/scenario
pub async fn handle_choose_scenario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScenarioRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| choose_scenario(s, &req.scenario, req.prompt.as_deref()))
        .await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// PUT /api/v1/sessions/:id/response
pub async fn handle_save_response(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResponseRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| save_response(s, &req.answer_text))
        .await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// POST /api/v1/sessions/:id/followup
///
/// Generates or refreshes the follow-up question for the chosen scenario.
/// Each call replaces the previous result.
pub async fn handle_generate_followup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| state.with_rng(|rng| refresh_followup(s, rng)))
        .await?;
    if let Some(followup) = &next.followup {
        info!(
            "Session {id}: follow-up generated for {} (guess {} / {})",
            followup.target,
            followup.guess.label(),
            followup.confidence
        );
    }
    Ok(Json(SessionResponse::new(id, next)))
}

/// PUT /api/v1/sessions/:id/followup/answer
pub async fn handle_save_followup_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FollowupAnswerRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| save_followup_answer(s, &req.followup_answer_text))
        .await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// POST /api/v1/sessions/:id/alternative
pub async fn handle_generate_alternative(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let next = state
        .sessions
        .advance(id, |s| state.with_rng(|rng| generate_alternative(s, rng)))
        .await?;
    Ok(Json(SessionResponse::new(id, next)))
}

/// POST /api/v1/sessions/:id/feedback
///
/// Validates ratings, appends the row to the log, then records the submission on
/// the session. The session is locked for the whole sequence; a failed append
/// leaves it unsubmitted.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<SubmitResponse>, AppError> {
    let log_store = state.log_store.clone();
    let (next, row) = state
        .sessions
        .advance_and_commit(
            id,
            |s| submit_feedback(s, &form, Utc::now()),
            |row| async move {
                log_store.append(&row).await?;
                Ok(row)
            },
        )
        .await?;
    info!(
        "Session {id}: feedback submitted to {} log",
        state.log_store.backend_name()
    );

    Ok(Json(SubmitResponse {
        session: SessionResponse::new(id, next),
        row,
        summary_url: format!("/api/v1/sessions/{id}/summary"),
    }))
}

/// GET /api/v1/sessions/:id/summary
///
/// Markdown summary of this session's submitted row.
pub async fn handle_session_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let current = state.sessions.get(id).await?;
    let row = current
        .submitted
        .ok_or_else(|| AppError::NotFound(format!("Session {id} has not been submitted yet")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"interview_session_summary.md\"",
            ),
        ],
        render_summary(&row),
    ))
}
