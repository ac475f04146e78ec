//! Exam timer configuration, phases and per-timer transitions
//!
//! Every transition here is a pure function from one `ExamTimer` to the
//! next, so the collection can apply them as a map over a consistent
//! snapshot.

use std::fmt;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default length of the warning window at the end of working time
pub const DEFAULT_WARNING_SECONDS: u32 = 600;

/// Opaque identity of an exam timer, stable for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(Uuid);

impl ExamId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-authored exam settings. Range checks happen before this is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    pub year: u8,
    pub label: String,
    pub working_minutes: u32,
    pub perusal_minutes: u32,
    pub planning_minutes: u32,
}

impl ExamConfig {
    /// Perusal + planning + working, in minutes
    pub fn total_minutes(&self) -> u32 {
        self.perusal_minutes + self.planning_minutes + self.working_minutes
    }
}

/// Partial update of an `ExamConfig`; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfigUpdate {
    pub year: Option<u8>,
    pub label: Option<String>,
    pub working_minutes: Option<u32>,
    pub perusal_minutes: Option<u32>,
    pub planning_minutes: Option<u32>,
}

impl ExamConfigUpdate {
    /// Merge this update over an existing config
    pub fn apply(&self, config: &ExamConfig) -> ExamConfig {
        ExamConfig {
            year: self.year.unwrap_or(config.year),
            label: self.label.clone().unwrap_or_else(|| config.label.clone()),
            working_minutes: self.working_minutes.unwrap_or(config.working_minutes),
            perusal_minutes: self.perusal_minutes.unwrap_or(config.perusal_minutes),
            planning_minutes: self.planning_minutes.unwrap_or(config.planning_minutes),
        }
    }
}

/// Stage of an exam timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamPhase {
    Idle,
    Perusal,
    Planning,
    Working,
    Warning,
    Finished,
}

impl ExamPhase {
    /// Fixed ordering used when sorting timers for display
    pub fn priority(self) -> u8 {
        match self {
            ExamPhase::Perusal => 0,
            ExamPhase::Planning => 1,
            ExamPhase::Working => 2,
            ExamPhase::Warning => 3,
            ExamPhase::Finished => 4,
            ExamPhase::Idle => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExamPhase::Idle => "idle",
            ExamPhase::Perusal => "perusal",
            ExamPhase::Planning => "planning",
            ExamPhase::Working => "working",
            ExamPhase::Warning => "warning",
            ExamPhase::Finished => "finished",
        }
    }
}

impl fmt::Display for ExamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display banner shown above a running exam in perusal, planning or warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBanner {
    pub phase: ExamPhase,
    /// Whole minutes left in the banner's window, rounded up
    pub remaining_minutes: u32,
    /// Percent of the banner's window already elapsed
    pub elapsed_percent: f64,
}

/// Runtime state of one configured exam
///
/// All three remaining counters stay visible at all times. Only the one
/// belonging to the current phase moves; the others keep whatever value
/// they had when their phase was left (or not yet reached).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamTimer {
    pub id: ExamId,
    #[serde(flatten)]
    pub config: ExamConfig,
    pub phase: ExamPhase,
    pub is_running: bool,
    pub started_at: Option<DateTime<Local>>,
    pub finish_at: Option<DateTime<Local>>,
    pub perusal_remaining: u32,
    pub planning_remaining: u32,
    pub working_remaining: u32,
}

impl ExamTimer {
    /// Create an idle timer with counters at their configured lengths
    pub fn new(config: ExamConfig) -> Self {
        Self {
            id: ExamId::new(),
            perusal_remaining: config.perusal_minutes * 60,
            planning_remaining: config.planning_minutes * 60,
            working_remaining: config.working_minutes * 60,
            config,
            phase: ExamPhase::Idle,
            is_running: false,
            started_at: None,
            finish_at: None,
        }
    }

    /// Phase entered when the batch starts
    pub fn entry_phase(&self) -> ExamPhase {
        if self.config.perusal_minutes > 0 {
            ExamPhase::Perusal
        } else if self.config.planning_minutes > 0 {
            ExamPhase::Planning
        } else {
            ExamPhase::Working
        }
    }

    /// Start an idle timer at `now`. Anything not idle comes back unchanged.
    pub fn started(&self, now: DateTime<Local>) -> Self {
        if self.phase != ExamPhase::Idle {
            return self.clone();
        }

        let total = Duration::minutes(i64::from(self.config.total_minutes()));
        Self {
            phase: self.entry_phase(),
            is_running: true,
            started_at: Some(now),
            finish_at: Some(now + total),
            ..self.clone()
        }
    }

    /// Back to idle with fresh counters, whatever the current phase
    pub fn reset(&self) -> Self {
        Self::with_config(self.id, self.config.clone())
    }

    /// Apply a config update. Running timers are returned unchanged.
    pub fn updated(&self, update: &ExamConfigUpdate) -> Self {
        if self.is_running {
            return self.clone();
        }

        let config = update.apply(&self.config);
        Self {
            phase: self.phase,
            started_at: self.started_at,
            finish_at: self.finish_at,
            ..Self::with_config(self.id, config)
        }
    }

    /// Advance one second
    ///
    /// Exactly one counter moves, chosen by the current phase. Working time
    /// at or under `warning_seconds` (but above zero) switches to warning,
    /// and reaching zero finishes the timer.
    pub fn ticked(&self, warning_seconds: u32) -> Self {
        if !self.is_running || self.phase == ExamPhase::Finished {
            return self.clone();
        }

        let mut next = self.clone();
        match self.phase {
            ExamPhase::Perusal => {
                next.perusal_remaining = self.perusal_remaining.saturating_sub(1);
                if next.perusal_remaining == 0 {
                    next.phase = if self.config.planning_minutes > 0 {
                        ExamPhase::Planning
                    } else {
                        ExamPhase::Working
                    };
                }
            }
            ExamPhase::Planning => {
                next.planning_remaining = self.planning_remaining.saturating_sub(1);
                if next.planning_remaining == 0 {
                    next.phase = ExamPhase::Working;
                }
            }
            ExamPhase::Working | ExamPhase::Warning => {
                next.working_remaining = self.working_remaining.saturating_sub(1);
                if next.working_remaining == 0 {
                    next.phase = ExamPhase::Finished;
                    next.is_running = false;
                } else if next.working_remaining <= warning_seconds {
                    next.phase = ExamPhase::Warning;
                }
            }
            ExamPhase::Idle | ExamPhase::Finished => {}
        }
        next
    }

    /// Banner for the current phase, if it has one
    pub fn banner(&self, warning_seconds: u32) -> Option<PhaseBanner> {
        if !self.is_running {
            return None;
        }

        let (window, remaining) = match self.phase {
            ExamPhase::Perusal => (self.config.perusal_minutes * 60, self.perusal_remaining),
            ExamPhase::Planning => (self.config.planning_minutes * 60, self.planning_remaining),
            ExamPhase::Warning => (warning_seconds, self.working_remaining),
            _ => return None,
        };

        let elapsed_percent = if window > 0 {
            f64::from(window.saturating_sub(remaining)) / f64::from(window) * 100.0
        } else {
            0.0
        };

        Some(PhaseBanner {
            phase: self.phase,
            remaining_minutes: remaining.div_ceil(60),
            elapsed_percent,
        })
    }

    fn with_config(id: ExamId, config: ExamConfig) -> Self {
        Self {
            id,
            ..Self::new(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(perusal: u32, planning: u32, working: u32) -> ExamConfig {
        ExamConfig {
            year: 11,
            label: "Physics - IA1".to_string(),
            working_minutes: working,
            perusal_minutes: perusal,
            planning_minutes: planning,
        }
    }

    fn started(perusal: u32, planning: u32, working: u32) -> ExamTimer {
        ExamTimer::new(config(perusal, planning, working)).started(Local::now())
    }

    fn tick_n(mut timer: ExamTimer, n: u32) -> ExamTimer {
        for _ in 0..n {
            timer = timer.ticked(DEFAULT_WARNING_SECONDS);
        }
        timer
    }

    #[test]
    fn new_timer_is_idle_with_full_counters() {
        let timer = ExamTimer::new(config(10, 5, 60));
        assert_eq!(timer.phase, ExamPhase::Idle);
        assert!(!timer.is_running);
        assert!(timer.started_at.is_none());
        assert!(timer.finish_at.is_none());
        assert_eq!(timer.perusal_remaining, 600);
        assert_eq!(timer.planning_remaining, 300);
        assert_eq!(timer.working_remaining, 3600);
    }

    #[test]
    fn ids_are_unique() {
        let a = ExamTimer::new(config(0, 0, 60));
        let b = ExamTimer::new(config(0, 0, 60));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn entry_phase_follows_configured_prep() {
        assert_eq!(started(10, 5, 60).phase, ExamPhase::Perusal);
        assert_eq!(started(0, 5, 60).phase, ExamPhase::Planning);
        assert_eq!(started(0, 0, 60).phase, ExamPhase::Working);
    }

    #[test]
    fn start_commits_finish_time() {
        let now = Local::now();
        let timer = ExamTimer::new(config(10, 5, 60)).started(now);
        assert!(timer.is_running);
        assert_eq!(timer.started_at, Some(now));
        assert_eq!(timer.finish_at, Some(now + Duration::minutes(75)));
    }

    #[test]
    fn start_ignores_non_idle_timers() {
        let first = Local::now();
        let running = ExamTimer::new(config(0, 0, 60)).started(first);
        let again = running.started(first + Duration::minutes(5));
        assert_eq!(again, running);

        let finished = tick_n(running, 3600);
        assert_eq!(finished.phase, ExamPhase::Finished);
        assert_eq!(finished.started(Local::now()), finished);
    }

    #[test]
    fn full_phase_sequence() {
        let start = started(10, 5, 60);
        let finish_at = start.finish_at;

        let mut timer = start;
        let mut ticks = 0;
        let mut sequence = vec![timer.phase];
        while timer.is_running {
            let before = timer.clone();
            timer = timer.ticked(DEFAULT_WARNING_SECONDS);
            ticks += 1;

            let moved = [
                before.perusal_remaining != timer.perusal_remaining,
                before.planning_remaining != timer.planning_remaining,
                before.working_remaining != timer.working_remaining,
            ];
            assert_eq!(moved.iter().filter(|m| **m).count(), 1, "tick {ticks}");
            assert!(timer.perusal_remaining <= before.perusal_remaining);
            assert!(timer.planning_remaining <= before.planning_remaining);
            assert!(timer.working_remaining <= before.working_remaining);
            assert_eq!(timer.finish_at, finish_at);

            if sequence.last() != Some(&timer.phase) {
                sequence.push(timer.phase);
            }
            if timer.phase == ExamPhase::Warning && before.phase == ExamPhase::Working {
                assert_eq!(timer.working_remaining, 600);
            }
        }

        assert_eq!(ticks, 4500);
        assert_eq!(
            sequence,
            vec![
                ExamPhase::Perusal,
                ExamPhase::Planning,
                ExamPhase::Working,
                ExamPhase::Warning,
                ExamPhase::Finished,
            ]
        );
        assert_eq!(timer.working_remaining, 0);
    }

    #[test]
    fn perusal_hands_over_to_planning_then_working() {
        let timer = tick_n(started(10, 5, 60), 600);
        assert_eq!(timer.phase, ExamPhase::Planning);
        assert_eq!(timer.perusal_remaining, 0);
        assert_eq!(timer.planning_remaining, 300);

        let timer = tick_n(timer, 300);
        assert_eq!(timer.phase, ExamPhase::Working);
        assert_eq!(timer.working_remaining, 3600);
    }

    #[test]
    fn perusal_without_planning_goes_to_working() {
        let timer = tick_n(started(5, 0, 60), 300);
        assert_eq!(timer.phase, ExamPhase::Working);
        assert_eq!(timer.planning_remaining, 0);
    }

    #[test]
    fn frozen_counters_keep_pre_phase_values() {
        let timer = tick_n(started(10, 5, 60), 10);
        assert_eq!(timer.perusal_remaining, 590);
        assert_eq!(timer.planning_remaining, 300);
        assert_eq!(timer.working_remaining, 3600);
    }

    #[test]
    fn working_enters_warning_at_threshold() {
        let timer = tick_n(started(0, 0, 60), 2999);
        assert_eq!(timer.phase, ExamPhase::Working);
        assert_eq!(timer.working_remaining, 601);

        let timer = timer.ticked(DEFAULT_WARNING_SECONDS);
        assert_eq!(timer.phase, ExamPhase::Warning);
        assert_eq!(timer.working_remaining, 600);
    }

    #[test]
    fn short_working_time_warns_on_first_tick() {
        // Out of the form's range; the timer itself does not re-check config.
        let timer = started(0, 0, 8);
        assert_eq!(timer.phase, ExamPhase::Working);
        let timer = timer.ticked(DEFAULT_WARNING_SECONDS);
        assert_eq!(timer.phase, ExamPhase::Warning);
        assert_eq!(timer.working_remaining, 479);
    }

    #[test]
    fn warning_threshold_is_a_parameter() {
        let timer = tick_n(started(0, 0, 60), 3300);
        assert_eq!(timer.working_remaining, 300);
        assert_eq!(timer.phase, ExamPhase::Warning);

        let timer = started(0, 0, 60);
        let timer = (0..3300).fold(timer, |t, _| t.ticked(120));
        assert_eq!(timer.phase, ExamPhase::Working);
    }

    #[test]
    fn finishing_stops_the_timer() {
        let timer = tick_n(started(0, 0, 60), 3600);
        assert_eq!(timer.phase, ExamPhase::Finished);
        assert!(!timer.is_running);
        assert_eq!(timer.working_remaining, 0);

        assert_eq!(timer.ticked(DEFAULT_WARNING_SECONDS), timer);
    }

    #[test]
    fn idle_timer_does_not_tick() {
        let timer = ExamTimer::new(config(10, 5, 60));
        assert_eq!(timer.ticked(DEFAULT_WARNING_SECONDS), timer);
    }

    #[test]
    fn reset_mid_warning_restores_idle() {
        let timer = tick_n(started(10, 5, 60), 4000);
        assert_eq!(timer.phase, ExamPhase::Warning);

        let reset = timer.reset();
        assert_eq!(reset.id, timer.id);
        assert_eq!(reset.phase, ExamPhase::Idle);
        assert!(!reset.is_running);
        assert!(reset.started_at.is_none());
        assert!(reset.finish_at.is_none());
        assert_eq!(reset.perusal_remaining, 600);
        assert_eq!(reset.planning_remaining, 300);
        assert_eq!(reset.working_remaining, 3600);
    }

    #[test]
    fn update_running_timer_is_noop() {
        let timer = tick_n(started(10, 5, 60), 42);
        let update = ExamConfigUpdate {
            working_minutes: Some(90),
            label: Some("Chemistry".to_string()),
            ..Default::default()
        };
        assert_eq!(timer.updated(&update), timer);
    }

    #[test]
    fn update_idle_timer_recomputes_counters() {
        let timer = ExamTimer::new(config(10, 5, 60));
        let update = ExamConfigUpdate {
            perusal_minutes: Some(0),
            working_minutes: Some(90),
            ..Default::default()
        };
        let updated = timer.updated(&update);
        assert_eq!(updated.id, timer.id);
        assert_eq!(updated.phase, ExamPhase::Idle);
        assert_eq!(updated.config.label, "Physics - IA1");
        assert_eq!(updated.config.planning_minutes, 5);
        assert_eq!(updated.perusal_remaining, 0);
        assert_eq!(updated.planning_remaining, 300);
        assert_eq!(updated.working_remaining, 5400);
    }

    #[test]
    fn banner_tracks_prep_phases() {
        let timer = tick_n(started(10, 5, 60), 150);
        let banner = timer.banner(DEFAULT_WARNING_SECONDS).unwrap();
        assert_eq!(banner.phase, ExamPhase::Perusal);
        assert_eq!(banner.remaining_minutes, 8);
        assert!((banner.elapsed_percent - 25.0).abs() < f64::EPSILON);

        let timer = tick_n(timer, 450 + 1);
        let banner = timer.banner(DEFAULT_WARNING_SECONDS).unwrap();
        assert_eq!(banner.phase, ExamPhase::Planning);
        assert_eq!(banner.remaining_minutes, 5);
    }

    #[test]
    fn banner_only_for_prep_and_warning() {
        assert!(ExamTimer::new(config(10, 0, 60)).banner(600).is_none());
        assert!(started(0, 0, 60).banner(600).is_none());

        let warning = tick_n(started(0, 0, 60), 3300);
        let banner = warning.banner(600).unwrap();
        assert_eq!(banner.phase, ExamPhase::Warning);
        assert_eq!(banner.remaining_minutes, 5);
        assert!((banner.elapsed_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn phase_priority_order() {
        let order = [
            ExamPhase::Perusal,
            ExamPhase::Planning,
            ExamPhase::Working,
            ExamPhase::Warning,
            ExamPhase::Finished,
            ExamPhase::Idle,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
        }
    }
}
