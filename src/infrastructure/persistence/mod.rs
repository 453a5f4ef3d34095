//! Durable store implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::LinkRepository`].
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx, schema in `migrations/`
//! - [`MemoryLinkRepository`] - DashMap-backed store for development and tests

pub mod db_error;
pub mod memory_link_repository;
pub mod pg_link_repository;

pub use db_error::map_sqlx_error;
pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
