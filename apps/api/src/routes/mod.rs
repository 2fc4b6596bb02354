pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::logbook::handlers as logbook_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/scenarios", get(handlers::handle_list_scenarios))
        // Interview wizard
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_reset_session),
        )
        .route("/api/v1/sessions/:id/consent", post(handlers::handle_consent))
        .route(
            "/api/v1/sessions/:id/participant",
            put(handlers::handle_set_participant),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            put(handlers::handle_save_resume),
        )
        .route(
            "/api/v1/sessions/:id/scenario",
            put(handlers::handle_choose_scenario),
        )
        .route(
            "/api/v1/sessions/:id/response",
            put(handlers::handle_save_response),
        )
        .route(
            "/api/v1/sessions/:id/followup",
            post(handlers::handle_generate_followup),
        )
        .route(
            "/api/v1/sessions/:id/followup/answer",
            put(handlers::handle_save_followup_answer),
        )
        .route(
            "/api/v1/sessions/:id/alternative",
            post(handlers::handle_generate_alternative),
        )
        .route(
            "/api/v1/sessions/:id/feedback",
            post(handlers::handle_submit_feedback),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            get(handlers::handle_session_summary),
        )
        // Researcher view
        .route(
            "/api/v1/admin/summary",
            get(logbook_handlers::handle_admin_summary),
        )
        .route(
            "/api/v1/admin/logs.csv",
            get(logbook_handlers::handle_admin_export),
        )
        .with_state(state)
}
