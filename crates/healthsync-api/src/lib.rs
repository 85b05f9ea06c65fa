//! Data model for healthsync
//!
//! This crate defines the records the synchronizer reads, merges, caches
//! and pushes:
//! - Daily symptom records and sleep sessions
//! - The local cache envelope
//! - The remote upsert request body
//! - Manual overrides supplied by the user
//! - Explicit read outcomes (value vs. unavailable-with-reason)

mod reading;
mod types;

pub use reading::*;
pub use types::*;
