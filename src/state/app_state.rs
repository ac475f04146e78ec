//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{ExamTimerSet, SingleTimer};
use crate::{
    config::Config,
    engine::{CountdownEngine, ExamEngine},
    utils::format_uptime,
};

/// Main application state that owns both timer engines and the wall clock
pub struct AppState {
    /// Exam timers, started and reset as a batch
    pub exams: ExamEngine,
    /// Standalone countdown
    pub countdown: CountdownEngine,
    /// Wall-clock time refreshed once a second for display
    pub current_time_tx: watch::Sender<DateTime<Local>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState from the runtime configuration
    pub fn new(config: &Config) -> Self {
        let countdown = SingleTimer::with_thresholds(
            config.minutes,
            config.warning_minutes,
            config.danger_minutes,
        );
        let (current_time_tx, _) = watch::channel(Local::now());

        Self {
            exams: ExamEngine::new(ExamTimerSet::new(config.exam_warning_seconds())),
            countdown: CountdownEngine::new(countdown),
            current_time_tx,
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Remember the latest user action for the status endpoint
    pub fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => warn!("Failed to record last action: {}", e),
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Latest wall-clock reading published by the clock task
    pub fn current_time(&self) -> DateTime<Local> {
        *self.current_time_tx.borrow()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }

    /// Release both engines' tick sources
    pub fn shutdown(&self) {
        if let Err(e) = self.exams.shutdown() {
            warn!("Failed to stop exam ticker: {}", e);
        }
        if let Err(e) = self.countdown.shutdown() {
            warn!("Failed to stop countdown ticker: {}", e);
        }
        info!("Timer engines stopped");
    }
}
