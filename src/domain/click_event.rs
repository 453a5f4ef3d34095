//! Click event model for asynchronous click counting.

use chrono::{DateTime, Utc};

/// A pending click increment for one link.
///
/// Produced by the resolver when a redirect is served from the cache and
/// consumed by [`crate::domain::click_worker::run_click_worker`]. The
/// redirect response never waits on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub id: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a new click event for the link `id`.
    pub fn new(id: impl Into<String>, clicked_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            clicked_at,
        }
    }
}
