//! Wall-clock refresh background task

use std::{sync::Arc, time::Duration};
use chrono::Local;
use tokio::time::interval;
use tracing::info;

use crate::state::AppState;

/// Background task that republishes the local time once a second.
///
/// Display only: no timer state is touched here.
pub async fn wall_clock_task(state: Arc<AppState>) {
    info!("Starting wall-clock task");

    let mut interval = interval(Duration::from_secs(1));

    loop {
        interval.tick().await;
        state.current_time_tx.send_replace(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test(start_paused = true)]
    async fn republishes_local_time_every_second() {
        let state = Arc::new(AppState::new(&Config::default()));
        let stale = Local::now() - chrono::Duration::hours(1);
        state.current_time_tx.send_replace(stale);

        let mut rx = state.current_time_tx.subscribe();
        rx.borrow_and_update();
        let task = tokio::spawn(wall_clock_task(Arc::clone(&state)));

        rx.changed().await.unwrap();
        let first = *rx.borrow_and_update();
        assert!(first > stale);
        assert_eq!(state.current_time(), first);

        tokio::time::advance(Duration::from_secs(1)).await;
        rx.changed().await.unwrap();
        assert!(state.current_time() >= first);

        task.abort();
    }
}
