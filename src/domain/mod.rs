//! Domain layer containing business entities and logic.
//!
//! This module defines the link model, the storage contracts the services
//! depend on, and the click worker that runs beside request traffic.
//! It has no dependency on PostgreSQL, Redis or HTTP.
//!
//! # Architecture
//!
//! - [`entities`] - Link records and cache entries
//! - [`repositories`] - Durable store trait definitions
//! - [`clock`] - Injectable wall-clock
//! - [`click_event`] - Click increment event model
//! - [`click_worker`] - Background click counter worker
//!
//! # Click Processing Flow
//!
//! 1. The resolver serves a redirect from the cache
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel (never awaited)
//! 3. [`click_worker::run_click_worker`] increments the counter with retry
//!
//! On a cache miss the resolver increments the counter itself, synchronously.

pub mod click_event;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod repositories;
