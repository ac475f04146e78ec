//! Collection of exam timers and the batch operations over it

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::exam_timer::{ExamConfig, ExamConfigUpdate, ExamId, ExamTimer, DEFAULT_WARNING_SECONDS};

/// Ordered set of exam timers, kept in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamTimerSet {
    pub exams: Vec<ExamTimer>,
    /// Working seconds left at which an exam switches to its warning phase
    pub warning_seconds: u32,
}

impl ExamTimerSet {
    pub fn new(warning_seconds: u32) -> Self {
        Self {
            exams: Vec::new(),
            warning_seconds,
        }
    }

    /// True while at least one exam is counting down
    pub fn is_any_running(&self) -> bool {
        self.exams.iter().any(|exam| exam.is_running)
    }

    pub fn get(&self, id: ExamId) -> Option<&ExamTimer> {
        self.exams.iter().find(|exam| exam.id == id)
    }

    pub fn contains(&self, id: ExamId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    /// Append a new idle exam and return a copy of it
    pub fn add(&mut self, config: ExamConfig) -> ExamTimer {
        let exam = ExamTimer::new(config);
        self.exams.push(exam.clone());
        exam
    }

    /// Merge a config update into one exam. Running exams are left alone.
    ///
    /// Returns whether the exam changed.
    pub fn update(&mut self, id: ExamId, update: &ExamConfigUpdate) -> bool {
        let mut changed = false;
        self.exams = self
            .exams
            .iter()
            .map(|exam| {
                if exam.id != id {
                    return exam.clone();
                }
                let next = exam.updated(update);
                changed = next != *exam;
                next
            })
            .collect();
        changed
    }

    /// Drop one exam, running or not. Returns whether it existed.
    pub fn remove(&mut self, id: ExamId) -> bool {
        let before = self.exams.len();
        self.exams.retain(|exam| exam.id != id);
        self.exams.len() != before
    }

    /// Start every idle exam at `now`; running and finished exams are untouched
    pub fn start_all(&mut self, now: DateTime<Local>) {
        self.exams = self.exams.iter().map(|exam| exam.started(now)).collect();
    }

    /// Force every exam back to idle with fresh counters
    pub fn reset_all(&mut self) {
        self.exams = self.exams.iter().map(ExamTimer::reset).collect();
    }

    /// Advance every running exam by one second
    ///
    /// Each next state is computed from the previous snapshot of the whole
    /// collection; no exam observes another's post-tick value.
    pub fn tick(&mut self) {
        let warning_seconds = self.warning_seconds;
        self.exams = self
            .exams
            .iter()
            .map(|exam| exam.ticked(warning_seconds))
            .collect();
    }

    /// Exams in the order a supervisor should see them
    ///
    /// While anything runs: exams still in perusal or planning come first
    /// (soonest to finish their prep first), then exams in working time by
    /// working seconds left, then the rest by phase priority. Otherwise
    /// insertion order.
    pub fn display_order(&self) -> Vec<&ExamTimer> {
        let mut ordered: Vec<&ExamTimer> = self.exams.iter().collect();
        if self.is_any_running() {
            ordered.sort_by_key(|exam| display_rank(exam));
        }
        ordered
    }
}

impl Default for ExamTimerSet {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_SECONDS)
    }
}

fn display_rank(exam: &ExamTimer) -> (u8, u32) {
    use super::exam_timer::ExamPhase::*;

    match exam.phase {
        Perusal => (Perusal.priority(), exam.perusal_remaining),
        Planning => (Perusal.priority(), exam.planning_remaining),
        Working | Warning => (Working.priority(), exam.working_remaining),
        phase => (phase.priority(), 0),
    }
}
