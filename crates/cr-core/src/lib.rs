//! cr-core: shared types, errors and configuration.
//!
//! This crate is the foundational dependency for the other cr-* crates,
//! providing the extraction data model, a unified error type and the
//! application configuration.

pub mod config;
pub mod error;
pub mod extraction;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use extraction::*;
