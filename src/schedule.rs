//! Timers for work that happens on the wall clock rather than per request.

use crate::errors::AppError;
use crate::intake::date_key;
use crate::state::AppState;
use crate::storage::persist_data;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
use std::{future::Future, time::Duration};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug, info};

pub fn next_midnight(now: NaiveDateTime) -> NaiveDateTime {
    (now.date() + ChronoDuration::days(1)).and_time(NaiveTime::MIN)
}

pub fn until_next_midnight(now: NaiveDateTime) -> Duration {
    (next_midnight(now) - now).to_std().unwrap_or(Duration::ZERO)
}

/// A job re-run after each delay returned by `next_delay`, until cancelled.
///
/// Dropping the handle stops the loop before its next run.
pub struct ScheduledTask {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn spawn<D, J, Fut>(mut next_delay: D, mut job: J) -> Self
    where
        D: FnMut() -> Duration + Send + 'static,
        J: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            loop {
                let delay = next_delay();
                debug!(?delay, "scheduled task sleeping");
                tokio::select! {
                    _ = &mut cancel_rx => break,
                    _ = tokio::time::sleep(delay) => job().await,
                }
            }
        });

        Self {
            cancel: Some(cancel_tx),
            handle,
        }
    }

    /// Stops the loop and waits for a run in progress to finish.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        let _ = self.handle.await;
    }
}

/// Midnight job: reports how the finished day went and drops days outside
/// the retention window. Returns the number of days pruned.
pub async fn roll_over_day(state: &AppState, today: NaiveDate) -> Result<usize, AppError> {
    let mut data = state.data.lock().await;

    let yesterday = today - ChronoDuration::days(1);
    let goal_ml = data.profile.daily_goal_ml(state.goal_formula);
    let total_ml = data.total_on(yesterday);
    info!(
        date = %date_key(yesterday),
        total_ml,
        goal_ml,
        goal_met = total_ml >= f64::from(goal_ml),
        "day closed"
    );

    let cutoff = today - ChronoDuration::days(i64::from(state.retention_days));
    let mut next = data.clone();
    let pruned = next.prune_before(cutoff);
    if pruned > 0 {
        persist_data(&state.data_path, &next).await?;
        *data = next;
        info!(pruned, cutoff = %date_key(cutoff), "pruned old intake days");
    }
    Ok(pruned)
}
