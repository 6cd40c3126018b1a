//! Route handlers for the HTTP API.

pub mod extract;
pub mod health;
