//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use serde::Serialize;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tracing::{info, warn};

use super::{
    responses::{
        ClockResponse, CountdownResponse, ExamOptionsResponse, ExamView, ExamsResponse,
        HealthResponse, StatusResponse,
    },
    validation::{DurationRequest, ExamUpdateRequest, NewExamRequest},
};
use crate::{
    error::{Error, Result},
    state::{AppState, ExamId},
};

/// Handle GET /exams - Snapshot of every exam
pub async fn list_exams_handler(State(state): State<Arc<AppState>>) -> Result<Json<ExamsResponse>> {
    let exams = state.exams.snapshot()?;
    Ok(Json(ExamsResponse::from_set(&exams)))
}

/// Handle POST /exams - Configure a new exam
pub async fn add_exam_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewExamRequest>,
) -> Result<(StatusCode, Json<ExamView>)> {
    let config = request.validate()?;
    let exam = state.exams.add_exam_if_idle(config)?;
    state.record_action("add-exam");

    let warning_seconds = state.exams.snapshot()?.warning_seconds;
    Ok((StatusCode::CREATED, Json(ExamView::new(&exam, warning_seconds))))
}

/// Handle PATCH /exams/:id - Edit an idle exam
pub async fn update_exam_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ExamId>,
    Json(request): Json<ExamUpdateRequest>,
) -> Result<Json<ExamView>> {
    let update = request.validate()?;
    let exam = state.exams.edit_exam_if_idle(id, &update)?;
    state.record_action("update-exam");

    let warning_seconds = state.exams.snapshot()?.warning_seconds;
    Ok(Json(ExamView::new(&exam, warning_seconds)))
}

/// Handle DELETE /exams/:id - Remove an exam, even while it runs
pub async fn remove_exam_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ExamId>,
) -> Result<Json<ExamsResponse>> {
    if !state.exams.remove_exam(id)? {
        return Err(Error::ExamNotFound(id));
    }
    state.record_action("remove-exam");

    let exams = state.exams.snapshot()?;
    Ok(Json(ExamsResponse::from_set(&exams)))
}

/// Handle POST /exams/start - Start every idle exam
pub async fn start_exams_handler(State(state): State<Arc<AppState>>) -> Result<Json<ExamsResponse>> {
    let exams = state.exams.start_all()?;
    if exams.is_empty() {
        warn!("Start requested with no exams configured");
    }
    state.record_action("start-all");
    Ok(Json(ExamsResponse::from_set(&exams)))
}

/// Handle POST /exams/reset - Return every exam to idle
pub async fn reset_exams_handler(State(state): State<Arc<AppState>>) -> Result<Json<ExamsResponse>> {
    let exams = state.exams.reset_all()?;
    state.record_action("reset-all");
    Ok(Json(ExamsResponse::from_set(&exams)))
}

/// Handle GET /exams/options - Values the exam form may offer
pub async fn exam_options_handler() -> Json<ExamOptionsResponse> {
    Json(ExamOptionsResponse::new())
}

/// Handle GET /exams/stream - Server-sent exam snapshots
pub async fn exams_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let rx = state.exams.subscribe()?;
    info!("Exam stream subscriber connected");

    let stream = WatchStream::new(rx)
        .map(|exams| Ok(json_event("exams", &ExamsResponse::from_set(&exams))));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Handle GET /countdown - Single countdown snapshot
pub async fn countdown_handler(State(state): State<Arc<AppState>>) -> Result<Json<CountdownResponse>> {
    let timer = state.countdown.snapshot()?;
    Ok(Json(CountdownResponse::from(&timer)))
}

/// Handle POST /countdown/start - Start or resume
pub async fn countdown_start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownResponse>> {
    let timer = state.countdown.start()?;
    state.record_action("countdown-start");
    Ok(Json(CountdownResponse::from(&timer)))
}

/// Handle POST /countdown/pause - Pause a running countdown
pub async fn countdown_pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownResponse>> {
    let timer = state.countdown.pause()?;
    state.record_action("countdown-pause");
    Ok(Json(CountdownResponse::from(&timer)))
}

/// Handle POST /countdown/reset - Back to the full duration
pub async fn countdown_reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownResponse>> {
    let timer = state.countdown.reset()?;
    state.record_action("countdown-reset");
    Ok(Json(CountdownResponse::from(&timer)))
}

/// Handle PUT /countdown/duration - Choose a new duration
pub async fn countdown_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<CountdownResponse>> {
    let minutes = request.validate()?;
    let timer = state.countdown.set_duration_if_stopped(minutes)?;
    state.record_action("countdown-duration");
    Ok(Json(CountdownResponse::from(&timer)))
}

/// Handle GET /countdown/stream - Server-sent countdown snapshots
pub async fn countdown_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let rx = state.countdown.subscribe()?;
    info!("Countdown stream subscriber connected");

    let stream = WatchStream::new(rx)
        .map(|timer| Ok(json_event("countdown", &CountdownResponse::from(&timer))));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Handle GET /clock - Current wall-clock time
pub async fn clock_handler(State(state): State<Arc<AppState>>) -> Json<ClockResponse> {
    Json(ClockResponse {
        now: state.current_time(),
    })
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>> {
    let exams = state.exams.snapshot()?;
    let countdown = state.countdown.snapshot()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        exam_count: exams.len(),
        exams_running: exams.is_any_running(),
        countdown_state: countdown.state,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn json_event<T: Serialize>(name: &str, body: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(body)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}
