//! In-process cache with per-entry TTL.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::CacheEntry;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Inserts between full sweeps of expired slots.
const PURGE_EVERY: usize = 1024;

#[derive(Debug, Clone)]
struct Slot {
    entry: CacheEntry,
    expires_at: DateTime<Utc>,
}

/// Cache backed by a [`DashMap`], with expiry measured on an injected clock.
///
/// Expired slots are dropped on read, and every [`PURGE_EVERY`] inserts the
/// whole map is swept. Used for the `memory` storage
/// backend and as the cache fake in tests, where a
/// [`crate::domain::clock::ManualClock`] lets TTLs elapse instantly.
pub struct MemoryCache {
    slots: DashMap<String, Slot>,
    clock: Arc<dyn Clock>,
    inserts: AtomicUsize,
}

impl MemoryCache {
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache measuring TTLs on `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: DashMap::new(),
            clock,
            inserts: AtomicUsize::new(0),
        }
    }

    /// Drops every slot whose TTL has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| now < slot.expires_at);
        before.saturating_sub(self.slots.len())
    }

    /// Number of slots held, including ones whose TTL elapsed but were not read since.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, id: &str) -> CacheResult<Option<CacheEntry>> {
        let now = self.clock.now();

        match self.slots.get(id) {
            Some(slot) if now < slot.expires_at => return Ok(Some(slot.entry.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        // The read guard is released above; removing on the same shard is safe here.
        self.slots.remove_if(id, |_, slot| now >= slot.expires_at);
        Ok(None)
    }

    async fn set(&self, id: &str, entry: &CacheEntry, ttl: Duration) -> CacheResult<()> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|e| CacheError::OperationError(format!("TTL out of range: {}", e)))?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::OperationError("TTL out of range".to_string()))?;

        self.slots.insert(
            id.to_string(),
            Slot {
                entry: entry.clone(),
                expires_at,
            },
        );

        if (self.inserts.fetch_add(1, Ordering::Relaxed) + 1) % PURGE_EVERY == 0 {
            let removed = self.purge_expired();
            tracing::debug!(removed, "Purged expired cache slots");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
