//! Repository trait definitions for the domain layer.
//!
//! The traits here abstract the durable store following the Repository
//! pattern. Implementations live in `crate::infrastructure::persistence`;
//! mock implementations are generated via `mockall` for unit tests.
//!
//! # Testing
//!
//! See `tests/repository_link.rs` for the PostgreSQL implementation and the
//! unit tests in `crate::infrastructure::persistence::memory_link_repository`.

pub mod link_repository;

pub use link_repository::{LinkCounts, LinkRepository, StoreError, StoreResult};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
