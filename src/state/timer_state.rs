//! Single countdown timer state and its derived display values

use serde::{Deserialize, Serialize};

use crate::utils::format::format_countdown;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_WARNING_THRESHOLD_MINUTES: u32 = 10;
pub const DEFAULT_DANGER_THRESHOLD_MINUTES: u32 = 5;

/// Lifecycle of the single countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Remaining-time band used to colour the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Safe,
    Warning,
    Danger,
}

/// One countdown with pause/resume and urgency banding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleTimer {
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub state: TimerState,
    pub warning_threshold_minutes: u32,
    pub danger_threshold_minutes: u32,
}

impl SingleTimer {
    /// Create an idle timer of `minutes` with the default thresholds
    pub fn new(minutes: u32) -> Self {
        Self::with_thresholds(
            minutes,
            DEFAULT_WARNING_THRESHOLD_MINUTES,
            DEFAULT_DANGER_THRESHOLD_MINUTES,
        )
    }

    pub fn with_thresholds(minutes: u32, warning_minutes: u32, danger_minutes: u32) -> Self {
        Self {
            total_seconds: minutes * 60,
            remaining_seconds: minutes * 60,
            state: TimerState::Idle,
            warning_threshold_minutes: warning_minutes,
            danger_threshold_minutes: danger_minutes,
        }
    }

    /// Start or resume. A finished timer stays finished until reset.
    pub fn start(&mut self) {
        if self.state != TimerState::Finished {
            self.state = TimerState::Running;
        }
    }

    /// Pause a running timer; anything else is left as is
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn reset(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.state = TimerState::Idle;
    }

    /// Replace the duration and return to idle.
    ///
    /// Callers keep `minutes` within (0, 480]; it is not checked here.
    pub fn set_duration(&mut self, minutes: u32) {
        self.total_seconds = minutes * 60;
        self.remaining_seconds = self.total_seconds;
        self.state = TimerState::Idle;
    }

    /// Count down one second while running
    ///
    /// Hitting zero finishes the timer in the same tick; the counter never
    /// goes below zero.
    pub fn tick(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.state = TimerState::Finished;
        } else {
            self.remaining_seconds -= 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn urgency(&self) -> Urgency {
        if self.state == TimerState::Idle {
            return Urgency::Safe;
        }
        let minutes_remaining = f64::from(self.remaining_seconds) / 60.0;
        if minutes_remaining <= f64::from(self.danger_threshold_minutes) {
            Urgency::Danger
        } else if minutes_remaining <= f64::from(self.warning_threshold_minutes) {
            Urgency::Warning
        } else {
            Urgency::Safe
        }
    }

    /// Percent of the total duration already elapsed
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.total_seconds.saturating_sub(self.remaining_seconds);
        f64::from(elapsed) / f64::from(self.total_seconds) * 100.0
    }

    pub fn formatted_time(&self) -> String {
        format_countdown(self.remaining_seconds)
    }

    /// Heading shown above the countdown
    pub fn status_label(&self) -> &'static str {
        match self.state {
            TimerState::Idle => "Ready",
            TimerState::Running => "Time Remaining",
            TimerState::Paused => "Paused",
            TimerState::Finished => "Time's Up!",
        }
    }
}

impl Default for SingleTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MINUTES)
    }
}
