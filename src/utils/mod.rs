//! Helpers shared across layers.
//!
//! - [`id_generator`] - random URL-safe identifiers
//! - [`url_validator`] - original URL validation and short URL composition

pub mod id_generator;
pub mod url_validator;
