//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::CacheEntry;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache for redirect lookups with per-entry TTL.
///
/// Implementations report failures instead of hiding them; the resolver
/// decides how to degrade (a failed read is treated as a miss, a failed
/// write is logged). There is no delete: entries only leave by TTL.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache driven by a [`crate::domain::clock::Clock`]
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the entry cached for a link identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` on cache hit (positive or negative)
    /// - `Ok(None)` on cache miss
    async fn get(&self, id: &str) -> CacheResult<Option<CacheEntry>>;

    /// Stores an entry, replacing any previous one, expiring after `ttl`.
    async fn set(&self, id: &str, entry: &CacheEntry, ttl: Duration) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;
}
