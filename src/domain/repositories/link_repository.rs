//! Repository trait for the durable link store.

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Errors raised by durable store implementations.
///
/// Services translate these into [`crate::error::AppError`] at their boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An insert hit a uniqueness constraint (`id` or `short_url`).
    #[error("unique constraint violation on {constraint}")]
    UniqueViolation { constraint: String },

    /// The store failed or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Aggregate counters over the durable store, used by the admin tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub total: i64,
    pub permanent: i64,
    pub expiring: i64,
    pub expired_pending: i64,
    pub total_clicks: i64,
}

/// Repository interface for the authoritative link records.
///
/// Every method is a single, independent store call: no method spans a
/// transaction with the cache or with another method.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `clicks = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if `id` or `short_url` is taken.
    /// Returns [`StoreError::Unavailable`] on store failures.
    async fn insert(&self, new_link: NewLinkRecord) -> StoreResult<LinkRecord>;

    /// Finds a link by its identifier, expired or not.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<LinkRecord>>;

    /// Finds a link by its original URL.
    ///
    /// When concurrent creations left several rows for the same URL, the
    /// oldest one is returned.
    async fn find_by_original_url(&self, original_url: &str) -> StoreResult<Option<LinkRecord>>;

    /// Increments the click counter and returns the new value.
    ///
    /// Returns `Ok(None)` if no record has this identifier.
    async fn increment_clicks(&self, id: &str) -> StoreResult<Option<i64>>;

    /// Deletes a single link. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Deletes every link with `expires_at <= now` and returns how many were removed.
    ///
    /// Permanent links (`expires_at IS NULL`) are never touched.
    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;

    /// Counts links by lifecycle state at `now`.
    async fn counts(&self, now: DateTime<Utc>) -> StoreResult<LinkCounts>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> StoreResult<()>;
}
