//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::validation::{
    working_minute_options, DEFAULT_YEAR, DURATION_PRESETS, MAX_DURATION_MINUTES,
    PREP_MINUTE_OPTIONS, YEAR_RANGE,
};
use crate::{
    error::Error,
    state::{ExamId, ExamTimer, ExamTimerSet, PhaseBanner, SingleTimer, TimerState, Urgency},
};

/// One exam as shown on a card: its full state plus the phase banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamView {
    #[serde(flatten)]
    pub exam: ExamTimer,
    pub banner: Option<PhaseBanner>,
}

impl ExamView {
    pub fn new(exam: &ExamTimer, warning_seconds: u32) -> Self {
        Self {
            exam: exam.clone(),
            banner: exam.banner(warning_seconds),
        }
    }
}

/// Snapshot of the whole exam set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamsResponse {
    pub is_any_running: bool,
    pub warning_seconds: u32,
    /// Exams in insertion order
    pub exams: Vec<ExamView>,
    /// Exam ids in the order a supervisor display should show them
    pub display_order: Vec<ExamId>,
    pub timestamp: DateTime<Utc>,
}

impl ExamsResponse {
    pub fn from_set(set: &ExamTimerSet) -> Self {
        Self {
            is_any_running: set.is_any_running(),
            warning_seconds: set.warning_seconds,
            exams: set
                .exams
                .iter()
                .map(|exam| ExamView::new(exam, set.warning_seconds))
                .collect(),
            display_order: set.display_order().iter().map(|exam| exam.id).collect(),
            timestamp: Utc::now(),
        }
    }
}

/// Single countdown with its derived display values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub state: TimerState,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub urgency: Urgency,
    pub progress: f64,
    pub formatted_time: String,
    pub status_label: String,
    pub warning_threshold_minutes: u32,
    pub danger_threshold_minutes: u32,
    pub presets: Vec<u32>,
    pub max_minutes: u32,
}

impl From<&SingleTimer> for CountdownResponse {
    fn from(timer: &SingleTimer) -> Self {
        Self {
            state: timer.state,
            total_seconds: timer.total_seconds,
            remaining_seconds: timer.remaining_seconds,
            urgency: timer.urgency(),
            progress: timer.progress(),
            formatted_time: timer.formatted_time(),
            status_label: timer.status_label().to_string(),
            warning_threshold_minutes: timer.warning_threshold_minutes,
            danger_threshold_minutes: timer.danger_threshold_minutes,
            presets: DURATION_PRESETS.to_vec(),
            max_minutes: MAX_DURATION_MINUTES,
        }
    }
}

/// Choices offered by the exam form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamOptionsResponse {
    pub years: Vec<u8>,
    pub default_year: u8,
    pub working_minutes: Vec<u32>,
    pub perusal_minutes: Vec<u32>,
    pub planning_minutes: Vec<u32>,
}

impl ExamOptionsResponse {
    pub fn new() -> Self {
        Self {
            years: YEAR_RANGE.collect(),
            default_year: DEFAULT_YEAR,
            working_minutes: working_minute_options(),
            perusal_minutes: PREP_MINUTE_OPTIONS.to_vec(),
            planning_minutes: PREP_MINUTE_OPTIONS.to_vec(),
        }
    }
}

impl Default for ExamOptionsResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockResponse {
    pub now: DateTime<Local>,
}

/// Server status with a summary of both engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub exam_count: usize,
    pub exams_running: bool,
    pub countdown_state: TimerState,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body returned with every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ExamNotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::LockPoisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
