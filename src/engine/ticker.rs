//! Owned periodic tick source

use std::{ops::ControlFlow, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::debug;

/// Period between engine ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running tick task
///
/// The task calls `on_tick` once per period, first one period after spawn,
/// until the callback breaks or the handle is dropped. Dropping the handle
/// aborts the task, so whoever owns the `Ticker` owns the periodic work.
#[derive(Debug)]
pub struct Ticker {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F>(name: &'static str, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        debug!("Starting {} ticker", name);

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    debug!("{} ticker stopped itself", name);
                    break;
                }
            }
        });

        Self { name, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling {} ticker", self.name);
            self.handle.abort();
        }
    }
}
