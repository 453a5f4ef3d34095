//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its lifetime and click counter.
///
/// Created once by the shortener and never updated afterwards except for
/// `clicks`. `expires_at = None` marks a permanent link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LinkRecord {
    /// Returns true if the link can never expire.
    pub fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Returns true if the link's lifetime has elapsed at `now`.
    ///
    /// The boundary is inclusive: a link is expired at exactly `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Time left before expiry at `now`, or `None` for permanent links.
    ///
    /// Returns a zero duration for links that are already expired.
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Option<chrono::TimeDelta> {
        self.expires_at
            .map(|e| (e - now).max(chrono::TimeDelta::zero()))
    }
}

/// Input data for inserting a new link.
///
/// The store assigns `clicks = 0` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinkRecord {
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLinkRecord {
    /// Materializes the record as it exists right after insertion.
    pub fn into_record(self) -> LinkRecord {
        LinkRecord {
            id: self.id,
            original_url: self.original_url,
            short_url: self.short_url,
            clicks: 0,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}
