//! Sync orchestrator

use chrono::NaiveDate;
use healthsync_api::{LocalSymptoms, Reading, SymptomOverrides, UpdateSymptoms};
use healthsync_config::SyncSettings;
use healthsync_host_api::{Connectivity, HealthProvider, Notice, Notifier, RemoteSymptoms};
use healthsync_store::{KvStore, SymptomCache};
use healthsync_util::{CycleId, ReadWindow};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    FreshReadings, HealthReader, SingleFlight, SyncError, SyncOutcome, SyncReport, SyncResult,
    SyncState, read_with_deadline, resolve,
};

/// The sync engine
pub struct SyncEngine {
    inner: Arc<EngineInner>,
    flights: SingleFlight<NaiveDate, SyncResult<SyncReport>>,
}

struct EngineInner {
    reader: Arc<HealthReader>,
    cache: SymptomCache,
    remote: Option<Arc<dyn RemoteSymptoms>>,
    connectivity: Arc<dyn Connectivity>,
    notifier: Arc<dyn Notifier>,
    read_timeout: Duration,
    day_locks: Mutex<HashMap<NaiveDate, Arc<AsyncMutex<()>>>>,
}

impl SyncEngine {
    /// Create a new sync engine with no remote endpoint
    pub fn new(
        settings: &SyncSettings,
        provider: Arc<dyn HealthProvider>,
        store: Arc<dyn KvStore>,
        connectivity: Arc<dyn Connectivity>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        info!(
            read_timeout_ms = settings.read_timeout.as_millis() as u64,
            prefix = %settings.cache_key_prefix,
            "Sync engine initialized"
        );

        let inner = EngineInner {
            reader: Arc::new(HealthReader::new(provider)),
            cache: SymptomCache::new(store, settings.cache_key_prefix.clone()),
            remote: None,
            connectivity,
            notifier,
            read_timeout: settings.read_timeout,
            day_locks: Mutex::new(HashMap::new()),
        };

        Self {
            inner: Arc::new(inner),
            flights: SingleFlight::new(),
        }
    }

    /// Attach the remote endpoint records are pushed to
    pub fn with_remote(mut self, remote: Arc<dyn RemoteSymptoms>) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.remote = Some(remote),
            None => warn!("Engine already shared, remote not attached"),
        }
        self
    }

    pub fn cache(&self) -> &SymptomCache {
        &self.inner.cache
    }

    pub fn reader(&self) -> &Arc<HealthReader> {
        &self.inner.reader
    }

    /// Sync today's record
    pub async fn sync(&self, overrides: SymptomOverrides) -> SyncResult<SyncReport> {
        self.sync_day(healthsync_util::today(), overrides).await
    }

    /// Sync the record for `day`.
    ///
    /// Triggers without overrides coalesce onto a cycle already running for
    /// the same day. Triggers with overrides always run their own cycle,
    /// after any cycle in progress for that day.
    pub async fn sync_day(
        &self,
        day: NaiveDate,
        overrides: SymptomOverrides,
    ) -> SyncResult<SyncReport> {
        if !overrides.is_empty() {
            return self.inner.run_cycle(day, overrides).await;
        }

        let inner = self.inner.clone();
        let (result, leader) = self
            .flights
            .run(day, move || async move {
                inner.run_cycle(day, SymptomOverrides::default()).await
            })
            .await;

        if !leader {
            debug!(day = %day, "Joined in-flight sync cycle");
        }
        result
    }
}

impl EngineInner {
    fn day_lock(&self, day: NaiveDate) -> Arc<AsyncMutex<()>> {
        let mut locks = self.day_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|d, lock| *d == day || Arc::strong_count(lock) > 1);
        locks.entry(day).or_default().clone()
    }

    fn guarded<T, F, Fut>(&self, read: F) -> impl Future<Output = Reading<T>>
    where
        F: FnOnce(Arc<HealthReader>) -> Fut,
        Fut: Future<Output = Reading<T>> + Send + 'static,
        T: Send + 'static,
    {
        read_with_deadline(read(self.reader.clone()), self.read_timeout)
    }

    async fn run_cycle(
        &self,
        day: NaiveDate,
        overrides: SymptomOverrides,
    ) -> SyncResult<SyncReport> {
        let lock = self.day_lock(day);
        let _guard = lock.lock().await;

        let cycle_id = CycleId::new();
        let span = info_span!("sync_cycle", cycle_id = %cycle_id, day = %day);

        self.run_locked(cycle_id, day, overrides)
            .instrument(span)
            .await
    }

    async fn run_locked(
        &self,
        cycle_id: CycleId,
        day: NaiveDate,
        overrides: SymptomOverrides,
    ) -> SyncResult<SyncReport> {
        let mut states = vec![SyncState::Idle];
        let mut enter = |state: SyncState| {
            debug!(state = %state, "Sync state");
            states.push(state);
        };

        enter(SyncState::Reading);
        let fresh = self.read_all(ReadWindow::for_day(day)).await;

        enter(SyncState::Merging);
        let cached = match self.cache.read(day) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Cache read failed, merging without cached record");
                None
            }
        };
        let resolved = resolve(fresh, &overrides, cached.as_ref().map(|c| &c.symptoms));
        let mut symptoms = resolved.symptoms;
        debug!(sources = ?resolved.sources, "Record resolved");

        enter(SyncState::PersistingLocal);
        let purged_keys = match self.cache.purge_except(day) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Stale cache cleanup failed");
                Vec::new()
            }
        };
        self.persist(day, &LocalSymptoms::unsynced(symptoms.clone()))?;

        let outcome = match &self.remote {
            None => {
                debug!("No remote configured, keeping record local");
                SyncOutcome::LocalOnly
            }
            Some(remote) => {
                enter(SyncState::CheckingConnectivity);
                if !self.connectivity.is_connected().await {
                    info!("Offline, sync deferred");
                    self.notifier.notify(Notice::SyncDeferred { day });
                    SyncOutcome::Deferred
                } else {
                    enter(SyncState::PushingRemote);
                    let body = UpdateSymptoms::from(&symptoms);
                    match remote.upsert(day, &body).await {
                        Ok(response) if response.is_success() => {
                            if let Some(server) = &response.symptoms {
                                symptoms.adopt_server_metadata(server);
                            }
                            self.persist(day, &LocalSymptoms::synced(symptoms.clone()))?;
                            SyncOutcome::Synced
                        }
                        Ok(response) => {
                            warn!(status = response.status, "Remote rejected upsert");
                            SyncOutcome::Rejected {
                                status: response.status,
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "Remote upsert failed, record stays unsynced");
                            SyncOutcome::PushFailed {
                                reason: e.to_string(),
                            }
                        }
                    }
                }
            }
        };

        enter(SyncState::Done);
        info!(outcome = ?outcome, purged = purged_keys.len(), "Sync cycle complete");

        Ok(SyncReport {
            cycle_id,
            day,
            symptoms,
            sources: resolved.sources,
            outcome,
            states,
            purged_keys,
        })
    }

    async fn read_all(&self, window: ReadWindow) -> FreshReadings {
        let (pulse, aggregated_steps, summed_steps, active_calories, sleep_hours, sleep_sessions) = tokio::join!(
            self.guarded(move |r| async move { r.heart_rate(window).await }),
            self.guarded(move |r| async move { r.aggregated_steps(window).await }),
            self.guarded(move |r| async move { r.steps(window).await }),
            self.guarded(move |r| async move { r.active_calories(window).await }),
            self.guarded(move |r| async move { r.total_sleep_hours(window).await }),
            self.guarded(move |r| async move { r.sleep_sessions(window).await }),
        );

        log_reading("pulse", &pulse);
        log_reading("aggregated_steps", &aggregated_steps);
        log_reading("steps", &summed_steps);
        log_reading("active_calories", &active_calories);
        log_reading("sleep_hours", &sleep_hours);
        log_reading("sleep_sessions", &sleep_sessions);

        FreshReadings {
            pulse,
            steps: aggregated_steps.or(summed_steps),
            active_calories_burned: active_calories,
            sleep_hours,
            sleep_sessions,
        }
    }

    fn persist(&self, day: NaiveDate, envelope: &LocalSymptoms) -> SyncResult<()> {
        self.cache
            .write(day, envelope)
            .map_err(|e| SyncError::CacheWrite {
                key: self.cache.key_for(day),
                message: e.to_string(),
            })
    }
}

fn log_reading<T: Debug>(metric: &'static str, reading: &Reading<T>) {
    match reading {
        Reading::Value(v) => debug!(metric, value = ?v, "Metric read"),
        Reading::Unavailable(reason) if reading.is_failure() => {
            warn!(metric, reason = %reason, "Metric read failed")
        }
        Reading::Unavailable(reason) => debug!(metric, reason = %reason, "Metric unavailable"),
    }
}
