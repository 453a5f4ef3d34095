//! Cache entry model for the redirect cache.

/// Value stored in the cache under a link identifier.
///
/// The cache is never a source of truth for existence: a missing entry only
/// means "ask the durable store".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Positive entry: the identifier resolves to this URL.
    Url(String),
    /// Negative entry: the identifier is known to be expired.
    Expired,
}

impl CacheEntry {
    /// Wire value used for [`CacheEntry::Expired`] in string-valued caches.
    ///
    /// Not a valid absolute URL, so it cannot collide with a positive entry.
    pub const EXPIRED_SENTINEL: &'static str = "__expired__";

    /// Encodes the entry as a cache string value.
    pub fn encode(&self) -> &str {
        match self {
            CacheEntry::Url(url) => url,
            CacheEntry::Expired => Self::EXPIRED_SENTINEL,
        }
    }

    /// Decodes a cache string value.
    pub fn decode(raw: String) -> Self {
        if raw == Self::EXPIRED_SENTINEL {
            CacheEntry::Expired
        } else {
            CacheEntry::Url(raw)
        }
    }
}
