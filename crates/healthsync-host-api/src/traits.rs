//! Host adapter traits

use async_trait::async_trait;
use chrono::NaiveDate;
use healthsync_api::{Symptoms, UpdateSymptoms};
use healthsync_util::ReadWindow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Aggregate, HealthRecord, RecordType};

/// Errors from the device health provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider not initialized")]
    NotInitialized,

    #[error("Unsupported record type: {0}")]
    UnsupportedRecordType(RecordType),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Device health data provider (Health Connect, HealthKit, an export file...)
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Bring the provider up. Returns whether it is usable.
    async fn initialize(&self) -> ProviderResult<bool>;

    /// Request read permission, returning the subset that was granted
    async fn request_permission(&self, record_types: &[RecordType])
    -> ProviderResult<Vec<RecordType>>;

    /// Read raw records of one type inside the window
    async fn read_records(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> ProviderResult<Vec<HealthRecord>>;

    /// Ask the provider for its own aggregate over the window
    async fn aggregate_records(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> ProviderResult<Aggregate>;
}

/// Network reachability snapshot, polled once per cycle
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// Errors from the remote symptoms endpoint
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Response of a remote upsert
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertResponse {
    pub status: u16,
    /// Stored record echoed back by the server, if it sent one
    pub symptoms: Option<Symptoms>,
}

impl UpsertResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            symptoms: None,
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            symptoms: None,
        }
    }

    /// Only an exact 200 marks the local envelope as synced
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Backend endpoint that stores one symptoms record per day
#[async_trait]
pub trait RemoteSymptoms: Send + Sync {
    async fn upsert(&self, day: NaiveDate, body: &UpdateSymptoms) -> RemoteResult<UpsertResponse>;
}

/// Informational, non-blocking notices for the end user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// No connectivity: the record stays cached and is pushed next cycle
    SyncDeferred { day: NaiveDate },
}

/// Sink for user notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
