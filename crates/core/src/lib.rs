//! Domain types shared across the stockdesk backend crates.
//!
//! Holds the pieces that every entity module agrees on: ID and timestamp
//! aliases, the error taxonomy, and the pagination protocol. This crate has
//! no database dependency; everything here is pure.

pub mod error;
pub mod pagination;
pub mod types;
