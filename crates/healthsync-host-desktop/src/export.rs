//! Health provider backed by a JSON export file
//!
//! The file holds the raw records a phone health store would return:
//!
//! ```json
//! { "records": [ { "recordType": "Steps", "startTime": "...", "endTime": "...", "count": 1200 } ] }
//! ```

use async_trait::async_trait;
use healthsync_host_api::{
    Aggregate, HealthProvider, HealthRecord, ProviderError, ProviderResult, RecordType,
};
use healthsync_util::ReadWindow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// On-disk export layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthExport {
    #[serde(default)]
    pub records: Vec<HealthRecord>,
    /// Record types the user has not granted access to
    #[serde(default)]
    pub denied: HashSet<RecordType>,
}

pub struct JsonExportProvider {
    path: PathBuf,
    export: RwLock<Option<HealthExport>>,
}

impl JsonExportProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            export: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ProviderResult<HealthExport> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&contents)
            .map_err(|e| ProviderError::Unavailable(format!("{}: {}", self.path.display(), e)))
    }

    async fn records_in(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> ProviderResult<Vec<HealthRecord>> {
        let guard = self.export.read().await;
        let export = guard.as_ref().ok_or(ProviderError::NotInitialized)?;

        if export.denied.contains(&record_type) {
            return Ok(Vec::new());
        }

        Ok(export
            .records
            .iter()
            .filter(|r| r.record_type() == record_type)
            .filter(|r| r.end_time() >= window.start && r.start_time() <= window.end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HealthProvider for JsonExportProvider {
    async fn initialize(&self) -> ProviderResult<bool> {
        match self.load().await {
            Ok(export) => {
                info!(
                    path = %self.path.display(),
                    records = export.records.len(),
                    "Loaded health export"
                );
                *self.export.write().await = Some(export);
                Ok(true)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Health export unavailable");
                Ok(false)
            }
        }
    }

    async fn request_permission(
        &self,
        record_types: &[RecordType],
    ) -> ProviderResult<Vec<RecordType>> {
        let guard = self.export.read().await;
        let export = guard.as_ref().ok_or(ProviderError::NotInitialized)?;

        Ok(record_types
            .iter()
            .copied()
            .filter(|t| !export.denied.contains(t))
            .collect())
    }

    async fn read_records(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> ProviderResult<Vec<HealthRecord>> {
        let records = self.records_in(record_type, window).await?;
        debug!(record_type = %record_type, count = records.len(), "Read export records");
        Ok(records)
    }

    async fn aggregate_records(
        &self,
        record_type: RecordType,
        window: ReadWindow,
    ) -> ProviderResult<Aggregate> {
        let records = self.records_in(record_type, window).await?;
        if records.is_empty() {
            return Ok(Aggregate::default());
        }

        match record_type {
            RecordType::Steps => Ok(Aggregate {
                count_total: Some(
                    records
                        .iter()
                        .map(|r| match r {
                            HealthRecord::Steps { count, .. } => *count,
                            _ => 0,
                        })
                        .sum(),
                ),
                energy_total_kcal: None,
            }),
            RecordType::ActiveCaloriesBurned | RecordType::TotalCaloriesBurned => Ok(Aggregate {
                count_total: None,
                energy_total_kcal: Some(
                    records
                        .iter()
                        .map(|r| match r {
                            HealthRecord::ActiveCaloriesBurned { kilocalories, .. }
                            | HealthRecord::TotalCaloriesBurned { kilocalories, .. } => {
                                *kilocalories
                            }
                            _ => 0.0,
                        })
                        .sum(),
                ),
            }),
            other => Err(ProviderError::UnsupportedRecordType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn window() -> ReadWindow {
        ReadWindow::for_day(NaiveDate::from_ymd_opt(2025, 10, 3).unwrap())
    }

    fn write_export(export: &HealthExport) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(export).unwrap().as_bytes())
            .unwrap();
        file
    }

    fn steps(offset_hours: i64, count: u64) -> HealthRecord {
        let at = window().start + Duration::hours(offset_hours);
        HealthRecord::Steps {
            start_time: at,
            end_time: at + Duration::minutes(30),
            count,
        }
    }

    #[tokio::test]
    async fn reads_require_initialization() {
        let file = write_export(&HealthExport::default());
        let provider = JsonExportProvider::new(file.path());

        let result = provider.read_records(RecordType::Steps, window()).await;
        assert!(matches!(result, Err(ProviderError::NotInitialized)));
    }

    #[tokio::test]
    async fn missing_file_initializes_false() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonExportProvider::new(dir.path().join("absent.json"));
        assert!(!provider.initialize().await.unwrap());
    }

    #[tokio::test]
    async fn filters_by_type_and_window() {
        let file = write_export(&HealthExport {
            records: vec![steps(8, 1000), steps(30, 9999), steps(12, 500)],
            denied: HashSet::new(),
        });
        let provider = JsonExportProvider::new(file.path());
        assert!(provider.initialize().await.unwrap());

        let records = provider
            .read_records(RecordType::Steps, window())
            .await
            .unwrap();
        assert_eq!(records.len(), 2);

        let heart = provider
            .read_records(RecordType::HeartRate, window())
            .await
            .unwrap();
        assert!(heart.is_empty());
    }

    #[tokio::test]
    async fn aggregates_steps_from_records() {
        let file = write_export(&HealthExport {
            records: vec![steps(8, 1000), steps(12, 500)],
            denied: HashSet::new(),
        });
        let provider = JsonExportProvider::new(file.path());
        provider.initialize().await.unwrap();

        let aggregate = provider
            .aggregate_records(RecordType::Steps, window())
            .await
            .unwrap();
        assert_eq!(aggregate.count_total, Some(1500));

        let sleep = provider
            .aggregate_records(RecordType::SleepSession, window())
            .await
            .unwrap();
        assert_eq!(sleep, Aggregate::default());
    }

    #[tokio::test]
    async fn denied_types_are_withheld() {
        let file = write_export(&HealthExport {
            records: vec![steps(8, 1000)],
            denied: [RecordType::Steps].into_iter().collect(),
        });
        let provider = JsonExportProvider::new(file.path());
        provider.initialize().await.unwrap();

        let granted = provider
            .request_permission(&[RecordType::Steps, RecordType::HeartRate])
            .await
            .unwrap();
        assert_eq!(granted, vec![RecordType::HeartRate]);
        assert!(
            provider
                .read_records(RecordType::Steps, window())
                .await
                .unwrap()
                .is_empty()
        );
    }
}
