//! Business logic services for the application layer.

pub mod cleanup_scheduler;
pub mod resolver;
pub mod shortener;

pub use cleanup_scheduler::CleanupScheduler;
pub use resolver::{CachePolicy, Resolution, Resolver};
pub use shortener::{ShortenOutcome, Shortener, ShortenerConfig};
