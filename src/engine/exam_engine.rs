//! Exam set engine: batch start/reset and per-exam configuration

use chrono::Local;
use tracing::{debug, info};

use super::{Tick, TimerEngine};
use crate::{
    error::{Error, Result},
    state::{ExamConfig, ExamConfigUpdate, ExamId, ExamTimer, ExamTimerSet},
};

pub type ExamEngine = TimerEngine<ExamTimerSet>;

impl Tick for ExamTimerSet {
    const NAME: &'static str = "exam";

    fn tick(&mut self) {
        let before: Vec<_> = self.exams.iter().map(|exam| exam.phase).collect();
        ExamTimerSet::tick(self);

        for (exam, previous) in self.exams.iter().zip(before) {
            if exam.phase != previous {
                info!(
                    "Exam {} ({}) moved from {} to {}",
                    exam.config.label, exam.id, previous, exam.phase
                );
            }
        }
    }

    fn needs_ticks(&self) -> bool {
        self.is_any_running()
    }
}

impl TimerEngine<ExamTimerSet> {
    /// Engine with no exams and the given warning window
    pub fn with_warning_seconds(warning_seconds: u32) -> Self {
        Self::new(ExamTimerSet::new(warning_seconds))
    }

    pub fn is_any_running(&self) -> Result<bool> {
        Ok(self.snapshot()?.is_any_running())
    }

    /// Configure a new idle exam
    pub fn add_exam(&self, config: ExamConfig) -> Result<ExamTimer> {
        let exam = self.mutate(|exams| exams.add(config))?;
        info!("Added exam {} ({})", exam.config.label, exam.id);
        Ok(exam)
    }

    /// Configure a new exam, refused while any exam is running
    ///
    /// The running check and the insert happen under the same lock, so a
    /// concurrent `start_all` can never leave a freshly added exam idle.
    pub fn add_exam_if_idle(&self, config: ExamConfig) -> Result<ExamTimer> {
        let exam = self.mutate(|exams| {
            if exams.is_any_running() {
                return Err(Error::Conflict("exams cannot be added while timers are running"));
            }
            Ok(exams.add(config))
        })??;
        info!("Added exam {} ({})", exam.config.label, exam.id);
        Ok(exam)
    }

    /// Edit an exam, refused while any exam is running
    pub fn edit_exam_if_idle(&self, id: ExamId, update: &ExamConfigUpdate) -> Result<ExamTimer> {
        let exam = self.mutate(|exams| {
            if !exams.contains(id) {
                return Err(Error::ExamNotFound(id));
            }
            if exams.is_any_running() {
                return Err(Error::Conflict("exams cannot be edited while timers are running"));
            }
            exams.update(id, update);
            exams.get(id).cloned().ok_or(Error::ExamNotFound(id))
        })??;
        info!("Updated exam {}", id);
        Ok(exam)
    }

    /// Merge a config update; ignored while that exam is running
    pub fn update_exam(&self, id: ExamId, update: &ExamConfigUpdate) -> Result<bool> {
        let changed = self.mutate(|exams| exams.update(id, update))?;
        if changed {
            info!("Updated exam {}", id);
        } else {
            debug!("Update for exam {} left it unchanged", id);
        }
        Ok(changed)
    }

    /// Remove an exam, running or not
    pub fn remove_exam(&self, id: ExamId) -> Result<bool> {
        let removed = self.mutate(|exams| exams.remove(id))?;
        if removed {
            info!("Removed exam {}", id);
        }
        Ok(removed)
    }

    /// Start every idle exam now
    pub fn start_all(&self) -> Result<ExamTimerSet> {
        let now = Local::now();
        let exams = self.mutate(|exams| {
            exams.start_all(now);
            exams.clone()
        })?;
        info!(
            "Started exams at {}: {} of {} running",
            now.format("%H:%M:%S"),
            exams.exams.iter().filter(|exam| exam.is_running).count(),
            exams.len()
        );
        Ok(exams)
    }

    /// Put every exam back to idle, abandoning any progress
    pub fn reset_all(&self) -> Result<ExamTimerSet> {
        let exams = self.mutate(|exams| {
            exams.reset_all();
            exams.clone()
        })?;
        info!("Reset {} exams", exams.len());
        Ok(exams)
    }
}
