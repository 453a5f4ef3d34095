//! Short link creation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::id_generator::generate_id;
use crate::utils::url_validator::{compose_short_url, validate_original_url};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Whether [`Shortener::shorten`] created a record or found one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenOutcome {
    Created(LinkRecord),
    Existing(LinkRecord),
}

impl ShortenOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ShortenOutcome::Created(_))
    }

    pub fn record(&self) -> &LinkRecord {
        match self {
            ShortenOutcome::Created(record) | ShortenOutcome::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> LinkRecord {
        match self {
            ShortenOutcome::Created(record) | ShortenOutcome::Existing(record) => record,
        }
    }
}

/// Settings for [`Shortener`].
#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    /// Public prefix of every short URL.
    pub base_url: String,
    /// Length of generated identifiers.
    pub id_length: usize,
    /// Insert attempts before giving up on identifier collisions.
    pub max_attempts: usize,
}

/// Creates short links, reusing the existing record for a known original URL.
pub struct Shortener {
    link_repository: Arc<dyn LinkRepository>,
    clock: Arc<dyn Clock>,
    config: ShortenerConfig,
}

impl Shortener {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        clock: Arc<dyn Clock>,
        config: ShortenerConfig,
    ) -> Self {
        Self {
            link_repository,
            clock,
            config,
        }
    }

    /// Returns the short link for `original_url`, creating one if needed.
    ///
    /// An existing record for the same original URL is returned as-is, even if
    /// it has since expired; `ttl_hours` is then ignored. Otherwise a new
    /// record is inserted with `expires_at = now + ttl_hours` when `ttl_hours`
    /// is a positive number, or no expiry at all.
    ///
    /// Deduplication is check-then-insert: two concurrent requests for a new
    /// URL may both create a record.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is malformed or the TTL overflows
    /// - [`AppError::StoreUnavailable`] if the store fails or every attempt
    ///   collides with an existing identifier
    pub async fn shorten(
        &self,
        original_url: &str,
        ttl_hours: Option<f64>,
    ) -> Result<ShortenOutcome, AppError> {
        let original_url = validate_original_url(original_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "field": "originalUrl" }))
        })?;

        if let Some(existing) = self
            .link_repository
            .find_by_original_url(&original_url)
            .await?
        {
            info!(id = %existing.id, "Returning existing short link");
            return Ok(ShortenOutcome::Existing(existing));
        }

        let now = self.clock.now();
        let expires_at = expiry_from_ttl(now, ttl_hours)?;

        for attempt in 1..=self.config.max_attempts {
            let id = generate_id(self.config.id_length).map_err(|e| {
                AppError::store_unavailable(
                    "Failed to generate identifier",
                    json!({ "reason": e.to_string() }),
                )
            })?;

            let new_link = NewLinkRecord {
                short_url: compose_short_url(&self.config.base_url, &id),
                id,
                original_url: original_url.clone(),
                created_at: now,
                expires_at,
            };

            match self.link_repository.insert(new_link).await {
                Ok(record) => {
                    info!(id = %record.id, expires_at = ?record.expires_at, "Short link created");
                    metrics::counter!("links_created_total").increment(1);
                    return Ok(ShortenOutcome::Created(record));
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(attempt, error = %e, "Identifier collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::store_unavailable(
            "Failed to generate a unique identifier",
            json!({ "attempts": self.config.max_attempts }),
        ))
    }
}

/// `now + ttl_hours`, or `None` unless `ttl_hours` is a finite positive number.
///
/// Fractional hours are honoured to the millisecond.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the expiry falls outside the
/// representable timestamp range.
pub fn expiry_from_ttl(
    now: DateTime<Utc>,
    ttl_hours: Option<f64>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(hours) = ttl_hours.filter(|h| h.is_finite() && *h > 0.0) else {
        return Ok(None);
    };

    let out_of_range = || AppError::bad_request("TTL is out of range", json!({ "field": "ttl" }));

    let millis = (hours * MILLIS_PER_HOUR).round();
    if millis >= i64::MAX as f64 {
        return Err(out_of_range());
    }

    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| now.checked_add_signed(delta))
        .map(Some)
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::{MockLinkRepository, StoreError};
    use crate::infrastructure::persistence::MemoryLinkRepository;
    use crate::utils::id_generator::is_valid_id;

    fn config() -> ShortenerConfig {
        ShortenerConfig {
            base_url: "https://s.example.com".to_string(),
            id_length: 7,
            max_attempts: 3,
        }
    }

    fn memory_shortener() -> (Shortener, Arc<MemoryLinkRepository>, ManualClock) {
        let repo = Arc::new(MemoryLinkRepository::new());
        let clock = ManualClock::new(Utc::now());
        let shortener = Shortener::new(repo.clone(), Arc::new(clock.clone()), config());
        (shortener, repo, clock)
    }

    #[tokio::test]
    async fn test_creates_permanent_link() {
        let (shortener, repo, clock) = memory_shortener();

        let outcome = shortener
            .shorten("https://example.com/page", None)
            .await
            .unwrap();

        assert!(outcome.is_created());
        let record = outcome.record();
        assert_eq!(record.id.len(), 7);
        assert!(is_valid_id(&record.id));
        assert_eq!(record.original_url, "https://example.com/page");
        assert_eq!(
            record.short_url,
            format!("https://s.example.com/{}", record.id)
        );
        assert_eq!(record.clicks, 0);
        assert_eq!(record.created_at, clock.now());
        assert!(record.expires_at.is_none());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_ttl_sets_expiry() {
        let (shortener, _repo, clock) = memory_shortener();

        let record = shortener
            .shorten("https://example.com", Some(1.0))
            .await
            .unwrap()
            .into_record();

        assert_eq!(record.expires_at, Some(clock.now() + TimeDelta::hours(1)));
    }

    #[tokio::test]
    async fn test_same_url_returns_existing_record() {
        let (shortener, repo, clock) = memory_shortener();

        let first = shortener
            .shorten("https://example.com", Some(1.0))
            .await
            .unwrap();
        clock.advance(TimeDelta::minutes(5));
        let second = shortener
            .shorten("https://example.com", Some(48.0))
            .await
            .unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        // The second request's ttl is ignored.
        assert_eq!(first.record(), second.record());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_existing_record_is_still_returned() {
        let (shortener, _repo, clock) = memory_shortener();

        let first = shortener
            .shorten("https://example.com", Some(1.0))
            .await
            .unwrap();
        clock.advance(TimeDelta::hours(2));
        let second = shortener
            .shorten("https://example.com", None)
            .await
            .unwrap();

        assert!(matches!(second, ShortenOutcome::Existing(_)));
        assert_eq!(first.record().id, second.record().id);
    }

    #[tokio::test]
    async fn test_rejects_invalid_url() {
        let (shortener, repo, _clock) = memory_shortener();

        for input in ["", "not a url", "ftp://example.com", "javascript:alert(1)"] {
            let err = shortener.shorten(input, None).await.unwrap_err();
            assert!(
                matches!(err, AppError::Validation { .. }),
                "{} should be rejected",
                input
            );
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_store_unavailable() {
        let (shortener, repo, _clock) = memory_shortener();
        repo.set_unavailable(true);

        let err = shortener
            .shorten("https://example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_retries_after_collision() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));

        let mut seq = mockall::Sequence::new();
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(StoreError::UniqueViolation {
                    constraint: "links_pkey".to_string(),
                })
            });
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(new_link.into_record()));

        let shortener = Shortener::new(
            Arc::new(repo),
            Arc::new(ManualClock::new(Utc::now())),
            config(),
        );

        let outcome = shortener
            .shorten("https://example.com", None)
            .await
            .unwrap();
        assert!(outcome.is_created());
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_insert().times(3).returning(|_| {
            Err(StoreError::UniqueViolation {
                constraint: "links_short_url_key".to_string(),
            })
        });

        let shortener = Shortener::new(
            Arc::new(repo),
            Arc::new(ManualClock::new(Utc::now())),
            config(),
        );

        let err = shortener
            .shorten("https://example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
        assert_eq!(err.to_error_info().details["attempts"], 3);
    }

    #[tokio::test]
    async fn test_non_collision_error_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));

        let shortener = Shortener::new(
            Arc::new(repo),
            Arc::new(ManualClock::new(Utc::now())),
            config(),
        );

        assert!(shortener.shorten("https://example.com", None).await.is_err());
    }

    #[test]
    fn test_expiry_from_ttl() {
        let now = Utc::now();

        assert_eq!(expiry_from_ttl(now, None).unwrap(), None);
        assert_eq!(expiry_from_ttl(now, Some(0.0)).unwrap(), None);
        assert_eq!(expiry_from_ttl(now, Some(-5.0)).unwrap(), None);
        assert_eq!(expiry_from_ttl(now, Some(f64::NAN)).unwrap(), None);
        assert_eq!(
            expiry_from_ttl(now, Some(24.0)).unwrap(),
            Some(now + TimeDelta::hours(24))
        );
        assert_eq!(
            expiry_from_ttl(now, Some(0.5)).unwrap(),
            Some(now + TimeDelta::minutes(30))
        );
    }

    #[test]
    fn test_expiry_from_huge_ttl_is_rejected() {
        let now = Utc::now();

        assert!(matches!(
            expiry_from_ttl(now, Some(1e300)),
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            expiry_from_ttl(now, Some(1e12)),
            Err(AppError::Validation { .. })
        ));
    }
}
