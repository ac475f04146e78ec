//! Timer engines
//!
//! An engine owns one timer state and, while that state needs it, exactly
//! one `Ticker`. Both live behind a single mutex so every mutation and
//! every tick sees a consistent snapshot, and the ticker is started or
//! dropped in the same critical section that changed the running flag.

pub mod countdown_engine;
pub mod exam_engine;
pub mod ticker;

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, Weak},
};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::error::{Error, Result};
pub use countdown_engine::CountdownEngine;
pub use exam_engine::ExamEngine;
pub use ticker::{Ticker, TICK_PERIOD};

/// Timer state that can be advanced one second at a time
pub trait Tick: Clone + Send + Sync + 'static {
    /// Name used in logs and lock errors
    const NAME: &'static str;

    /// Apply one second to everything that is counting down
    fn tick(&mut self);

    /// Whether a tick source is required right now
    fn needs_ticks(&self) -> bool;
}

struct EngineInner<S> {
    state: S,
    ticker: Option<Ticker>,
    updates_tx: watch::Sender<S>,
}

impl<S: Tick> EngineInner<S> {
    fn publish(&self) {
        self.updates_tx.send_replace(self.state.clone());
    }
}

/// Shared owner of a timer state and its tick source
pub struct TimerEngine<S> {
    inner: Arc<Mutex<EngineInner<S>>>,
}

impl<S: Tick> TimerEngine<S> {
    pub fn new(state: S) -> Self {
        let (updates_tx, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                state,
                ticker: None,
                updates_tx,
            })),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> Result<S> {
        Ok(self.lock()?.state.clone())
    }

    /// Receiver that sees every published state, mutations and ticks alike
    pub fn subscribe(&self) -> Result<watch::Receiver<S>> {
        Ok(self.lock()?.updates_tx.subscribe())
    }

    /// Whether a tick task is currently owned by this engine
    pub fn is_ticking(&self) -> Result<bool> {
        Ok(self.lock()?.ticker.is_some())
    }

    /// Drop the tick source. State is kept as is.
    pub fn shutdown(&self) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.ticker.take().is_some() {
            debug!("{} engine shut down with an active ticker", S::NAME);
        }
        Ok(())
    }

    /// Apply `f` to the state, then start or stop ticking to match it
    pub(crate) fn mutate<T>(&self, f: impl FnOnce(&mut S) -> T) -> Result<T> {
        let mut inner = self.lock()?;
        let result = f(&mut inner.state);
        self.sync_ticker(&mut inner);
        inner.publish();
        Ok(result)
    }

    fn sync_ticker(&self, inner: &mut EngineInner<S>) {
        match (inner.state.needs_ticks(), inner.ticker.is_some()) {
            (true, false) => {
                let weak = Arc::downgrade(&self.inner);
                inner.ticker = Some(Ticker::spawn(S::NAME, TICK_PERIOD, move || {
                    Self::on_tick(&weak)
                }));
            }
            (false, true) => {
                inner.ticker = None;
            }
            _ => {}
        }
    }

    fn on_tick(weak: &Weak<Mutex<EngineInner<S>>>) -> ControlFlow<()> {
        let Some(shared) = weak.upgrade() else {
            return ControlFlow::Break(());
        };
        let mut inner = match shared.lock() {
            Ok(inner) => inner,
            Err(_) => {
                error!("Failed to lock {} state, stopping ticker", S::NAME);
                return ControlFlow::Break(());
            }
        };

        inner.state.tick();
        inner.publish();

        if inner.state.needs_ticks() {
            ControlFlow::Continue(())
        } else {
            // Dropping our own handle; the task ends right after this returns.
            inner.ticker = None;
            ControlFlow::Break(())
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, EngineInner<S>>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned(S::NAME))
    }
}
