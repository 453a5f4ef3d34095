//! Background worker applying click increments off the redirect path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Up to `concurrency` increments run at once. Each increment is retried with
/// jittered exponential backoff; after the last retry the click is logged and
/// dropped. Increments still in flight when the channel closes are awaited
/// before this function returns, but nothing guarantees the worker gets that
/// far before process shutdown.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    link_repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = link_repository.clone();
        tokio::spawn(async move {
            let _permit = permit;
            record_click(repository.as_ref(), &event).await;
        });
    }

    // Wait for in-flight increments.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn record_click(repository: &dyn LinkRepository, event: &ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::spawn(strategy, || repository.increment_clicks(&event.id)).await {
        Ok(Some(clicks)) => {
            debug!(id = %event.id, clicks, "Click recorded");
        }
        Ok(None) => {
            debug!(id = %event.id, "Click dropped: link no longer exists");
        }
        Err(e) => {
            metrics::counter!("clicks_dropped_total", "reason" => "store_error").increment(1);
            warn!(id = %event.id, error = %e, "Click dropped after retries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockLinkRepository, StoreError};
    use chrono::Utc;
    use mockall::Sequence;

    #[tokio::test]
    async fn test_worker_increments_each_event() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks()
            .withf(|id| id == "abc1234")
            .times(3)
            .returning(|_| Ok(Some(1)));

        let (tx, rx) = mpsc::channel(16);
        for _ in 0..3 {
            tx.send(ClickEvent::new("abc1234", Utc::now())).await.unwrap();
        }
        drop(tx);

        run_click_worker(rx, Arc::new(repo), 2).await;
    }

    #[tokio::test]
    async fn test_worker_retries_transient_failures() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();
        repo.expect_increment_clicks()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));
        repo.expect_increment_clicks()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(7)));

        let (tx, rx) = mpsc::channel(4);
        tx.send(ClickEvent::new("retry01", Utc::now())).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(repo), 1).await;
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_max_retries() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));

        let (tx, rx) = mpsc::channel(4);
        tx.send(ClickEvent::new("gone001", Utc::now())).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(repo), 1).await;
    }

    #[tokio::test]
    async fn test_worker_tolerates_missing_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks()
            .times(1)
            .returning(|_| Ok(None));

        let (tx, rx) = mpsc::channel(4);
        tx.send(ClickEvent::new("missing", Utc::now())).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(repo), 4).await;
    }
}
