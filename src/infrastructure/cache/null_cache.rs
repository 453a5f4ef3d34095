//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::CacheEntry;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache that stores nothing.
///
/// Every lookup misses, so every redirect goes to the durable store and
/// negative caching is effectively off. Used when Redis is not configured or
/// unreachable at startup.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _id: &str) -> CacheResult<Option<CacheEntry>> {
        Ok(None)
    }

    async fn set(&self, _id: &str, _entry: &CacheEntry, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}
