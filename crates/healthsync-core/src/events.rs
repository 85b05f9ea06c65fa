//! Sync states and cycle results

use chrono::NaiveDate;
use healthsync_api::Symptoms;
use healthsync_util::CycleId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FieldSources;

/// States of one sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    Reading,
    Merging,
    PersistingLocal,
    CheckingConnectivity,
    PushingRemote,
    Done,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Idle => "idle",
            SyncState::Reading => "reading",
            SyncState::Merging => "merging",
            SyncState::PersistingLocal => "persisting_local",
            SyncState::CheckingConnectivity => "checking_connectivity",
            SyncState::PushingRemote => "pushing_remote",
            SyncState::Done => "done",
        };
        f.write_str(name)
    }
}

/// How the remote side of a cycle ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Remote returned 200; the cached envelope is marked synced
    Synced,
    /// No connectivity; pushing is left to the next cycle
    Deferred,
    /// No remote endpoint is configured
    LocalOnly,
    /// Remote answered with something other than 200
    Rejected { status: u16 },
    /// The remote call itself failed
    PushFailed { reason: String },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Synced => f.write_str("synced"),
            SyncOutcome::Deferred => f.write_str("deferred (offline)"),
            SyncOutcome::LocalOnly => f.write_str("saved locally (no remote configured)"),
            SyncOutcome::Rejected { status } => write!(f, "rejected by remote (HTTP {})", status),
            SyncOutcome::PushFailed { reason } => write!(f, "push failed: {}", reason),
        }
    }
}

/// What a sync cycle hands back to its caller
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub cycle_id: CycleId,
    pub day: NaiveDate,
    /// The resolved record, returned whatever the remote outcome
    pub symptoms: Symptoms,
    pub sources: FieldSources,
    pub outcome: SyncOutcome,
    /// States visited, in order
    pub states: Vec<SyncState>,
    /// Cache keys removed by stale cleanup
    pub purged_keys: Vec<String>,
}

impl SyncReport {
    pub fn visited(&self, state: SyncState) -> bool {
        self.states.contains(&state)
    }
}
