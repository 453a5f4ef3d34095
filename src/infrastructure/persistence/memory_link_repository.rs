//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{LinkCounts, LinkRepository, StoreError, StoreResult};

/// Link store kept in process memory.
///
/// Mirrors the PostgreSQL schema's constraints: `id` and `short_url` are
/// unique, `original_url` is not. A secondary index on `short_url` is
/// reserved before the primary insert so two concurrent inserts can never
/// both claim the same short URL.
///
/// [`MemoryLinkRepository::set_unavailable`] makes every call fail, to
/// exercise outage paths.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, LinkRecord>,
    short_urls: DashMap<String, String>,
    unavailable: AtomicBool,
}

impl MemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a store outage while `down` is true.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn remove_record(&self, id: &str) -> Option<LinkRecord> {
        let (_, record) = self.links.remove(id)?;
        self.short_urls.remove(&record.short_url);
        Some(record)
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewLinkRecord) -> StoreResult<LinkRecord> {
        self.check_available()?;

        match self.short_urls.entry(new_link.short_url.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::UniqueViolation {
                    constraint: "links_short_url_key".to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(new_link.id.clone());
            }
        }

        match self.links.entry(new_link.id.clone()) {
            Entry::Occupied(_) => {
                self.short_urls.remove(&new_link.short_url);
                Err(StoreError::UniqueViolation {
                    constraint: "links_pkey".to_string(),
                })
            }
            Entry::Vacant(slot) => {
                let record = new_link.into_record();
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<LinkRecord>> {
        self.check_available()?;
        Ok(self.links.get(id).map(|r| r.value().clone()))
    }

    async fn find_by_original_url(&self, original_url: &str) -> StoreResult<Option<LinkRecord>> {
        self.check_available()?;
        Ok(self
            .links
            .iter()
            .filter(|r| r.original_url == original_url)
            .min_by_key(|r| r.created_at)
            .map(|r| r.value().clone()))
    }

    async fn increment_clicks(&self, id: &str) -> StoreResult<Option<i64>> {
        self.check_available()?;
        Ok(self.links.get_mut(id).map(|mut r| {
            r.clicks += 1;
            r.clicks
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.check_available()?;
        Ok(self.remove_record(id).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        self.check_available()?;

        // Collect first: removing while iterating would deadlock on the shard lock.
        let expired: Vec<String> = self
            .links
            .iter()
            .filter(|r| r.is_expired_at(now))
            .map(|r| r.key().clone())
            .collect();

        let removed = expired
            .iter()
            .filter(|id| self.remove_record(id).is_some())
            .count();

        Ok(removed as u64)
    }

    async fn counts(&self, now: DateTime<Utc>) -> StoreResult<LinkCounts> {
        self.check_available()?;

        let counts = self
            .links
            .iter()
            .fold(LinkCounts::default(), |mut acc, r| {
                acc.total += 1;
                acc.total_clicks += r.clicks;
                match r.expires_at {
                    None => acc.permanent += 1,
                    Some(_) if r.is_expired_at(now) => acc.expired_pending += 1,
                    Some(_) => acc.expiring += 1,
                }
                acc
            });

        Ok(counts)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}
