//! HTTP API module
//! 
//! Endpoints the exam room displays use to read timer snapshots and drive
//! the engines, plus request validation and response structures.

pub mod handlers;
pub mod responses;
pub mod validation;

use std::sync::Arc;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/exams", get(list_exams_handler).post(add_exam_handler))
        .route("/exams/options", get(exam_options_handler))
        .route("/exams/start", post(start_exams_handler))
        .route("/exams/reset", post(reset_exams_handler))
        .route("/exams/stream", get(exams_stream_handler))
        .route("/exams/:id", patch(update_exam_handler).delete(remove_exam_handler))
        .route("/countdown", get(countdown_handler))
        .route("/countdown/start", post(countdown_start_handler))
        .route("/countdown/pause", post(countdown_pause_handler))
        .route("/countdown/reset", post(countdown_reset_handler))
        .route("/countdown/duration", put(countdown_duration_handler))
        .route("/countdown/stream", get(countdown_stream_handler))
        .route("/clock", get(clock_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
