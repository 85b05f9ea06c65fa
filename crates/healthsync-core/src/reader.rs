//! Platform health reader
//!
//! One method per metric. Each initializes the provider on first use,
//! requests the permission it needs, reads records or an aggregate over the
//! window, and derives the metric. None of them fail: missing data, denied
//! permission and provider errors all come back as `Reading::Unavailable`.

use healthsync_api::{Reading, SleepSession, Unavailable};
use healthsync_host_api::{HealthProvider, HealthRecord, RecordType};
use healthsync_util::{ReadWindow, round2};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Reads derived metrics from a health provider
pub struct HealthReader {
    provider: Arc<dyn HealthProvider>,
    initialized: OnceCell<()>,
}

impl HealthReader {
    pub fn new(provider: Arc<dyn HealthProvider>) -> Self {
        Self {
            provider,
            initialized: OnceCell::new(),
        }
    }

    /// Initialize the provider once. Concurrent callers share one attempt;
    /// a failed attempt is not remembered and is retried next call.
    pub async fn ensure_initialized(&self) -> Result<(), Unavailable> {
        self.initialized
            .get_or_try_init(|| async {
                match self.provider.initialize().await {
                    Ok(true) => {
                        debug!("Health provider initialized");
                        Ok(())
                    }
                    Ok(false) => {
                        warn!("Health provider reported itself unavailable");
                        Err(Unavailable::NotInitialized)
                    }
                    Err(e) => {
                        warn!(error = %e, "Health provider initialization failed");
                        Err(Unavailable::NotInitialized)
                    }
                }
            })
            .await
            .map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    async fn prepare(&self, record_type: RecordType) -> Result<(), Unavailable> {
        self.ensure_initialized().await?;

        let granted = self
            .provider
            .request_permission(&[record_type])
            .await
            .map_err(|e| Unavailable::Failed(e.to_string()))?;

        if granted.contains(&record_type) {
            Ok(())
        } else {
            debug!(record_type = %record_type, "Read permission denied");
            Err(Unavailable::PermissionDenied)
        }
    }

    async fn records(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> Result<Vec<HealthRecord>, Unavailable> {
        self.prepare(record_type).await?;

        let records = self
            .provider
            .read_records(record_type, window)
            .await
            .map_err(|e| Unavailable::Failed(e.to_string()))?;

        if records.is_empty() {
            return Err(Unavailable::NoData);
        }
        Ok(records)
    }

    /// Most recent heart rate sample in the window
    pub async fn heart_rate(&self, window: ReadWindow) -> Reading<f64> {
        let records = match self.records(RecordType::HeartRate, window).await {
            Ok(r) => r,
            Err(reason) => return Reading::Unavailable(reason),
        };

        records
            .iter()
            .filter_map(|r| match r {
                HealthRecord::HeartRate { samples, .. } => Some(samples.iter()),
                _ => None,
            })
            .flatten()
            .max_by_key(|s| s.time)
            .map(|s| s.beats_per_minute)
            .into()
    }

    /// Steps summed over raw records
    pub async fn steps(&self, window: ReadWindow) -> Reading<u64> {
        let records = match self.records(RecordType::Steps, window).await {
            Ok(r) => r,
            Err(reason) => return Reading::Unavailable(reason),
        };

        Reading::Value(
            records
                .iter()
                .map(|r| match r {
                    HealthRecord::Steps { count, .. } => *count,
                    _ => 0,
                })
                .sum(),
        )
    }

    /// Provider-computed step total for the window
    pub async fn aggregated_steps(&self, window: ReadWindow) -> Reading<u64> {
        if let Err(reason) = self.prepare(RecordType::Steps).await {
            return Reading::Unavailable(reason);
        }

        match self
            .provider
            .aggregate_records(RecordType::Steps, window)
            .await
        {
            Ok(aggregate) => aggregate.count_total.into(),
            Err(e) => Reading::Unavailable(Unavailable::Failed(e.to_string())),
        }
    }

    /// Active energy in kilocalories, floored
    pub async fn active_calories(&self, window: ReadWindow) -> Reading<f64> {
        self.energy_sum(RecordType::ActiveCaloriesBurned, window)
            .await
            .map(f64::floor)
    }

    /// Total energy in kilocalories, not floored
    pub async fn total_calories(&self, window: ReadWindow) -> Reading<f64> {
        self.energy_sum(RecordType::TotalCaloriesBurned, window).await
    }

    async fn energy_sum(&self, record_type: RecordType, window: ReadWindow) -> Reading<f64> {
        let records = match self.records(record_type, window).await {
            Ok(r) => r,
            Err(reason) => return Reading::Unavailable(reason),
        };

        Reading::Value(
            records
                .iter()
                .map(|r| match r {
                    HealthRecord::ActiveCaloriesBurned { kilocalories, .. }
                    | HealthRecord::TotalCaloriesBurned { kilocalories, .. } => *kilocalories,
                    _ => 0.0,
                })
                .sum(),
        )
    }

    /// All sleep sessions, most recent end first
    pub async fn sleep_sessions(&self, window: ReadWindow) -> Reading<Vec<SleepSession>> {
        let records = match self.records(RecordType::SleepSession, window).await {
            Ok(r) => r,
            Err(reason) => return Reading::Unavailable(reason),
        };

        let mut sessions: Vec<SleepSession> = records
            .iter()
            .filter_map(|r| match r {
                HealthRecord::SleepSession {
                    start_time,
                    end_time,
                } => Some(SleepSession::new(*start_time, *end_time)),
                _ => None,
            })
            .collect();
        sessions.sort_by(|a, b| b.end.cmp(&a.end));

        Reading::from_collection(sessions)
    }

    /// Total sleep in hours, two decimals
    pub async fn total_sleep_hours(&self, window: ReadWindow) -> Reading<f64> {
        self.sleep_sessions(window).await.map(|sessions| {
            let millis: i64 = sessions
                .iter()
                .map(|s| s.end.signed_duration_since(s.start).num_milliseconds())
                .sum();
            round2(millis as f64 / 3_600_000.0)
        })
    }

    /// The session that ended most recently
    pub async fn last_sleep_session(&self, window: ReadWindow) -> Reading<SleepSession> {
        match self.sleep_sessions(window).await {
            Reading::Value(sessions) => sessions.into_iter().next().into(),
            Reading::Unavailable(reason) => Reading::Unavailable(reason),
        }
    }
}
