//! Single countdown engine

use tracing::info;

use super::{Tick, TimerEngine};
use crate::{
    error::{Error, Result},
    state::SingleTimer,
};

pub type CountdownEngine = TimerEngine<SingleTimer>;

impl Tick for SingleTimer {
    const NAME: &'static str = "countdown";

    fn tick(&mut self) {
        SingleTimer::tick(self);
        if !self.is_running() {
            info!("Countdown finished");
        }
    }

    fn needs_ticks(&self) -> bool {
        self.is_running()
    }
}

impl TimerEngine<SingleTimer> {
    pub fn start(&self) -> Result<SingleTimer> {
        let timer = self.mutate(|timer| {
            timer.start();
            timer.clone()
        })?;
        info!("Countdown {:?} at {}", timer.state, timer.formatted_time());
        Ok(timer)
    }

    pub fn pause(&self) -> Result<SingleTimer> {
        let timer = self.mutate(|timer| {
            timer.pause();
            timer.clone()
        })?;
        info!("Countdown {:?} at {}", timer.state, timer.formatted_time());
        Ok(timer)
    }

    pub fn reset(&self) -> Result<SingleTimer> {
        let timer = self.mutate(|timer| {
            timer.reset();
            timer.clone()
        })?;
        info!("Countdown reset to {}", timer.formatted_time());
        Ok(timer)
    }

    /// Set a new duration and return to idle; callers keep `minutes` in (0, 480]
    pub fn set_duration(&self, minutes: u32) -> Result<SingleTimer> {
        let timer = self.mutate(|timer| {
            timer.set_duration(minutes);
            timer.clone()
        })?;
        info!("Countdown duration set to {} minutes", minutes);
        Ok(timer)
    }

    /// Like `set_duration`, but refused while the countdown is running
    pub fn set_duration_if_stopped(&self, minutes: u32) -> Result<SingleTimer> {
        let timer = self.mutate(|timer| {
            if timer.is_running() {
                return Err(Error::Conflict(
                    "duration cannot be changed while the countdown is running",
                ));
            }
            timer.set_duration(minutes);
            Ok(timer.clone())
        })??;
        info!("Countdown duration set to {} minutes", minutes);
        Ok(timer)
    }
}
