//! Core sync engine for healthsync
//!
//! This crate is the heart of healthsync, containing:
//! - Timeout guard (bounded reads that fall back instead of failing)
//! - Health reader (per-metric derivation over a provider)
//! - Merge resolver (fresh > override > cached, per field)
//! - Sync state machine (Idle -> Reading -> Merging -> PersistingLocal ->
//!   CheckingConnectivity -> PushingRemote -> Done)
//! - Single-flight coalescing of concurrent triggers for the same day

mod engine;
mod events;
mod flight;
mod guard;
mod merge;
mod reader;

pub use engine::*;
pub use events::*;
pub use flight::*;
pub use guard::*;
pub use merge::*;
pub use reader::*;

use thiserror::Error;

/// Errors that abort a sync cycle
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// Local persistence is a hard dependency
    #[error("Cache write failed for {key}: {message}")]
    CacheWrite { key: String, message: String },
}

pub type SyncResult<T> = Result<T, SyncError>;
