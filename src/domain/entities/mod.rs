//! Core domain entities.
//!
//! - [`LinkRecord`] - The authoritative short link mapping
//! - [`NewLinkRecord`] - Input for inserting a record
//! - [`CacheEntry`] - What the cache may hold for an identifier
//!
//! Entities are plain data; expiry checks take the current time as an argument
//! so callers decide which clock they trust.

pub mod cache_entry;
pub mod link;

pub use cache_entry::CacheEntry;
pub use link::{LinkRecord, NewLinkRecord};
