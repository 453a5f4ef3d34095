//! Cache-aside redirect resolution.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::clock::Clock;
use crate::domain::entities::{CacheEntry, LinkRecord};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Outcome of resolving an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect to this original URL.
    Found(String),
    /// The link existed but its lifetime has elapsed.
    Expired,
    /// No such link.
    NotFound,
}

/// TTLs applied when the resolver repopulates the cache.
///
/// The positive TTL is independent of a link's own `expires_at` unless
/// `cap_to_expiry` is set. With the cap off, a link may keep being served
/// from cache for up to `positive_ttl` after it expired; lowering
/// `positive_ttl` or enabling the cap shrinks that window at the cost of more
/// durable-store reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub positive_ttl: Duration,
    pub negative_ttl: Duration,
    pub cap_to_expiry: bool,
}

impl CachePolicy {
    /// TTL for a positive entry of `link` written at `now`.
    pub fn positive_ttl_for(&self, link: &LinkRecord, now: DateTime<Utc>) -> Duration {
        if !self.cap_to_expiry {
            return self.positive_ttl;
        }

        link.remaining_lifetime(now)
            .and_then(|remaining| remaining.to_std().ok())
            .map_or(self.positive_ttl, |remaining| remaining.min(self.positive_ttl))
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            positive_ttl: Duration::from_secs(86_400),
            negative_ttl: Duration::from_secs(300),
            cap_to_expiry: false,
        }
    }
}

/// Resolves identifiers to original URLs, fronting the durable store with the cache.
///
/// # Algorithm
///
/// 1. Cache lookup
///    - negative entry: `Expired`, no store read
///    - positive entry: click queued for the background worker, `Found`
/// 2. On miss, durable lookup by id
///    - absent: `NotFound`
///    - expired: record deleted, negative entry cached, `Expired`
///    - live: positive entry cached, click counted synchronously, `Found`
///
/// Cache and store are updated by independent calls; the cache may briefly
/// disagree with the store.
pub struct Resolver {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    click_sender: mpsc::Sender<ClickEvent>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl Resolver {
    /// Creates a new resolver.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            link_repository,
            cache,
            click_sender,
            clock,
            policy,
        }
    }

    /// Resolves `id`, counting a click on success.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the durable store fails.
    /// Cache failures never surface: a failed read falls through to the store
    /// and a failed write is logged.
    pub async fn resolve(&self, id: &str) -> Result<Resolution, AppError> {
        match self.cache.get(id).await {
            Ok(Some(CacheEntry::Expired)) => {
                debug!(%id, "Negative cache hit");
                record_outcome("expired_cached");
                return Ok(Resolution::Expired);
            }
            Ok(Some(CacheEntry::Url(url))) => {
                debug!(%id, "Cache hit");
                self.enqueue_click(id);
                record_outcome("cache_hit");
                return Ok(Resolution::Found(url));
            }
            Ok(None) => {
                debug!(%id, "Cache miss");
            }
            Err(e) => {
                warn!(%id, error = %e, "Cache read failed, falling back to store");
            }
        }

        let Some(link) = self.link_repository.find_by_id(id).await? else {
            record_outcome("not_found");
            return Ok(Resolution::NotFound);
        };

        let now = self.clock.now();

        if link.is_expired_at(now) {
            self.expire(&link).await;
            record_outcome("expired");
            return Ok(Resolution::Expired);
        }

        let ttl = self.policy.positive_ttl_for(&link, now);
        self.write_cache(id, &CacheEntry::Url(link.original_url.clone()), ttl)
            .await;

        match self.link_repository.increment_clicks(id).await? {
            Some(clicks) => debug!(%id, clicks, "Click recorded"),
            None => debug!(%id, "Link removed before its click was recorded"),
        }

        record_outcome("store_hit");
        Ok(Resolution::Found(link.original_url))
    }

    /// Deletes an expired record and caches the negative entry.
    ///
    /// A failed delete is logged only; the cleanup sweep removes the record later.
    async fn expire(&self, link: &LinkRecord) {
        match self.link_repository.delete(&link.id).await {
            Ok(true) => debug!(id = %link.id, "Expired link deleted"),
            Ok(false) => debug!(id = %link.id, "Expired link already deleted"),
            Err(e) => warn!(id = %link.id, error = %e, "Failed to delete expired link"),
        }

        self.write_cache(&link.id, &CacheEntry::Expired, self.policy.negative_ttl)
            .await;
    }

    async fn write_cache(&self, id: &str, entry: &CacheEntry, ttl: Duration) {
        if let Err(e) = self.cache.set(id, entry, ttl).await {
            warn!(%id, error = %e, "Cache write failed");
        }
    }

    /// Queues a click for the background worker without waiting.
    fn enqueue_click(&self, id: &str) {
        let event = ClickEvent::new(id, self.clock.now());

        match self.click_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                warn!(id = %event.id, "Click queue full, click dropped");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_closed").increment(1);
                warn!(id = %event.id, "Click queue closed, click dropped");
            }
        }
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("links_resolved_total", "outcome" => outcome).increment(1);
}
