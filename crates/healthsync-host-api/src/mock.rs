//! Mock host adapters for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use healthsync_api::UpdateSymptoms;
use healthsync_util::ReadWindow;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    Aggregate, Connectivity, HealthProvider, HealthRecord, Notice, Notifier, ProviderError,
    ProviderResult, RecordType, RemoteError, RemoteResult, RemoteSymptoms, UpsertResponse,
};

/// Mock health provider for unit/integration testing
pub struct MockHealthProvider {
    records: Arc<Mutex<HashMap<RecordType, Vec<HealthRecord>>>>,
    aggregates: Arc<Mutex<HashMap<RecordType, Aggregate>>>,
    init_calls: AtomicU32,

    /// Record types whose permission request is refused
    pub denied: Arc<Mutex<HashSet<RecordType>>>,

    /// Record types whose reads never settle
    pub hanging: Arc<Mutex<HashSet<RecordType>>>,

    /// Record types whose reads return an error
    pub failing: Arc<Mutex<HashSet<RecordType>>>,

    /// Configure initialize() to report the provider as unusable
    pub fail_init: Arc<Mutex<bool>>,

    /// Delay inside initialize() (exposes concurrent init races)
    pub init_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockHealthProvider {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            aggregates: Arc::new(Mutex::new(HashMap::new())),
            init_calls: AtomicU32::new(0),
            denied: Arc::new(Mutex::new(HashSet::new())),
            hanging: Arc::new(Mutex::new(HashSet::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            fail_init: Arc::new(Mutex::new(false)),
            init_delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a raw record
    pub fn push_record(&self, record: HealthRecord) {
        self.records
            .lock()
            .unwrap()
            .entry(record.record_type())
            .or_default()
            .push(record);
    }

    /// Replace every record of one type
    pub fn set_records(&self, record_type: RecordType, records: Vec<HealthRecord>) {
        self.records.lock().unwrap().insert(record_type, records);
    }

    /// Set the provider-computed aggregate for a type
    pub fn set_aggregate(&self, record_type: RecordType, aggregate: Aggregate) {
        self.aggregates.lock().unwrap().insert(record_type, aggregate);
    }

    pub fn deny(&self, record_type: RecordType) {
        self.denied.lock().unwrap().insert(record_type);
    }

    pub fn hang(&self, record_type: RecordType) {
        self.hanging.lock().unwrap().insert(record_type);
    }

    pub fn fail(&self, record_type: RecordType) {
        self.failing.lock().unwrap().insert(record_type);
    }

    /// How many times initialize() was called
    pub fn init_calls(&self) -> u32 {
        self.init_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self, record_type: RecordType) -> ProviderResult<()> {
        let hanging = self.hanging.lock().unwrap().contains(&record_type);
        if hanging {
            std::future::pending::<()>().await;
        }
        if self.failing.lock().unwrap().contains(&record_type) {
            return Err(ProviderError::ReadFailed(format!(
                "Mock read failure for {}",
                record_type
            )));
        }
        Ok(())
    }
}

impl Default for MockHealthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProvider for MockHealthProvider {
    async fn initialize(&self) -> ProviderResult<bool> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.init_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(!*self.fail_init.lock().unwrap())
    }

    async fn request_permission(
        &self,
        record_types: &[RecordType],
    ) -> ProviderResult<Vec<RecordType>> {
        let denied = self.denied.lock().unwrap();
        Ok(record_types
            .iter()
            .copied()
            .filter(|t| !denied.contains(t))
            .collect())
    }

    async fn read_records(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> ProviderResult<Vec<HealthRecord>> {
        self.gate(record_type).await?;

        let records = self.records.lock().unwrap();
        Ok(records
            .get(&record_type)
            .map(|list| {
                list.iter()
                    .filter(|r| r.end_time() >= window.start && r.start_time() <= window.end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn aggregate_records(
        &self,
        record_type: RecordType,
        _window: ReadWindow,
    ) -> ProviderResult<Aggregate> {
        self.gate(record_type).await?;

        Ok(self
            .aggregates
            .lock()
            .unwrap()
            .get(&record_type)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock connectivity with a switchable state
pub struct MockConnectivity {
    connected: AtomicBool,
    checks: AtomicU32,
}

impl MockConnectivity {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            checks: AtomicU32::new(0),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connectivity for MockConnectivity {
    async fn is_connected(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.connected.load(Ordering::SeqCst)
    }
}

/// What the mock remote should answer
#[derive(Debug, Clone)]
pub enum MockRemoteBehavior {
    Respond(UpsertResponse),
    Fail(String),
}

/// Mock remote endpoint that records every upsert it receives
pub struct MockRemote {
    pub behavior: Arc<Mutex<MockRemoteBehavior>>,
    calls: Arc<Mutex<Vec<(NaiveDate, UpdateSymptoms)>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(MockRemoteBehavior::Respond(UpsertResponse::ok()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn respond_with(&self, response: UpsertResponse) {
        *self.behavior.lock().unwrap() = MockRemoteBehavior::Respond(response);
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        *self.behavior.lock().unwrap() = MockRemoteBehavior::Fail(message.into());
    }

    /// Upserts received so far
    pub fn calls(&self) -> Vec<(NaiveDate, UpdateSymptoms)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSymptoms for MockRemote {
    async fn upsert(&self, day: NaiveDate, body: &UpdateSymptoms) -> RemoteResult<UpsertResponse> {
        self.calls.lock().unwrap().push((day, body.clone()));

        match self.behavior.lock().unwrap().clone() {
            MockRemoteBehavior::Respond(response) => Ok(response),
            MockRemoteBehavior::Fail(message) => Err(RemoteError::Request(message)),
        }
    }
}

/// Notifier that keeps every notice for later inspection
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
