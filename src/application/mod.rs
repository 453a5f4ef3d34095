//! Application layer services implementing business logic.
//!
//! Services receive their collaborators (repository, cache, clock, click
//! queue) through their constructors and expose the operations HTTP handlers
//! and the background tasks call.
//!
//! # Available Services
//!
//! - [`services::Resolver`] - identifier to original URL, with cache-aside lookup
//! - [`services::Shortener`] - short link creation with deduplication
//! - [`services::CleanupScheduler`] - daily sweep of expired links

pub mod services;
