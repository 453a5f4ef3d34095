//! Daily removal of expired links.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use tracing::{error, info};

use crate::domain::clock::Clock;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Deletes every record with `expires_at <= now` once a day at `run_at` (UTC).
///
/// Runs independently of request traffic. A failed sweep is logged and the
/// scheduler waits for the next scheduled time; it never stops on its own.
pub struct CleanupScheduler {
    link_repository: Arc<dyn LinkRepository>,
    clock: Arc<dyn Clock>,
    run_at: NaiveTime,
}

impl CleanupScheduler {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        clock: Arc<dyn Clock>,
        run_at: NaiveTime,
    ) -> Self {
        Self {
            link_repository,
            clock,
            run_at,
        }
    }

    /// Runs one sweep now and returns the number of records removed.
    pub async fn sweep(&self) -> Result<u64, AppError> {
        let now = self.clock.now();
        let removed = self.link_repository.delete_expired(now).await?;

        metrics::counter!("cleanup_removed_total").increment(removed);
        info!(removed, "Expired links cleaned up");

        Ok(removed)
    }

    /// Sweeps at every scheduled time, forever.
    ///
    /// The next run is recomputed from the clock after each sweep, so a slow
    /// sweep never shifts the schedule.
    pub async fn run(&self) {
        info!(run_at = %self.run_at, "Cleanup scheduler started");

        loop {
            let now = self.clock.now();
            let next = next_run_after(now, self.run_at);
            let wait = (next - now).to_std().unwrap_or_default();

            info!(next_run = %next, "Next cleanup scheduled");
            tokio::time::sleep(wait).await;

            if let Err(e) = self.sweep().await {
                error!(error = %e, "Cleanup run failed");
            }
        }
    }
}

/// First instant strictly after `now` whose UTC wall-clock time is `at`.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();

    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}
