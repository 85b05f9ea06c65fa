//! Integration tests for healthsync
//!
//! These drive the full sync engine against mock host adapters and an
//! in-memory SQLite store.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use healthsync_api::{LocalSymptoms, SleepSession, SymptomOverrides, Symptoms};
use healthsync_config::SyncSettings;
use healthsync_core::{FieldSource, SyncEngine, SyncOutcome, SyncState};
use healthsync_host_api::{
    HealthRecord, HeartRateSample, MockConnectivity, MockHealthProvider, MockRemote, Notice,
    RecordType, RecordingNotifier, UpsertResponse,
};
use healthsync_store::{KvStore, SqliteStore, SymptomCache};
use healthsync_util::ReadWindow;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    provider: Arc<MockHealthProvider>,
    store: Arc<SqliteStore>,
    connectivity: Arc<MockConnectivity>,
    remote: Arc<MockRemote>,
    notifier: Arc<RecordingNotifier>,
    engine: SyncEngine,
}

impl Harness {
    fn new() -> Self {
        Self::with_settings(SyncSettings::default())
    }

    fn with_settings(settings: SyncSettings) -> Self {
        let provider = Arc::new(MockHealthProvider::new());
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let connectivity = Arc::new(MockConnectivity::new(true));
        let remote = Arc::new(MockRemote::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let engine = SyncEngine::new(
            &settings,
            provider.clone(),
            store.clone(),
            connectivity.clone(),
            notifier.clone(),
        )
        .with_remote(remote.clone());

        Self {
            provider,
            store,
            connectivity,
            remote,
            notifier,
            engine,
        }
    }

    fn cache(&self) -> SymptomCache {
        SymptomCache::new(self.store.clone(), "symptoms_")
    }

    fn seed(&self, day: NaiveDate, symptoms: Symptoms) {
        self.cache()
            .write(day, &LocalSymptoms::unsynced(symptoms))
            .unwrap();
    }

    fn cached(&self, day: NaiveDate) -> LocalSymptoms {
        self.cache().read(day).unwrap().unwrap()
    }

    async fn sync(&self) -> healthsync_core::SyncReport {
        self.engine
            .sync_day(day(), SymptomOverrides::default())
            .await
            .unwrap()
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 3).unwrap()
}

fn at(hours: i64) -> DateTime<Utc> {
    ReadWindow::for_day(day()).start + ChronoDuration::hours(hours)
}

fn heart_rate(bpm: f64, hours: i64) -> HealthRecord {
    HealthRecord::HeartRate {
        start_time: at(hours),
        end_time: at(hours),
        samples: vec![HeartRateSample {
            time: at(hours),
            beats_per_minute: bpm,
        }],
    }
}

fn steps(count: u64) -> HealthRecord {
    HealthRecord::Steps {
        start_time: at(10),
        end_time: at(11),
        count,
    }
}

fn sleep(start: DateTime<Utc>, millis: i64) -> HealthRecord {
    HealthRecord::SleepSession {
        start_time: start,
        end_time: start + ChronoDuration::milliseconds(millis),
    }
}

fn cached_session() -> SleepSession {
    SleepSession::new(at(1), at(7))
}

#[tokio::test]
async fn unavailable_reads_fall_back_to_cache() {
    let h = Harness::new();
    h.provider.deny(RecordType::HeartRate);
    h.provider.fail(RecordType::Steps);
    h.seed(
        day(),
        Symptoms {
            pulse: Some(64.0),
            steps: Some(3100),
            ..Default::default()
        },
    );

    let report = h.sync().await;

    assert_eq!(report.symptoms.pulse, Some(64.0));
    assert_eq!(report.symptoms.steps, Some(3100));
    assert_eq!(report.sources.pulse, FieldSource::Cached);
    // Nothing fresh and nothing cached stays absent
    assert_eq!(report.symptoms.active_calories_burned, None);
    assert_eq!(report.sources.active_calories_burned, FieldSource::Absent);
}

#[tokio::test]
async fn unavailable_reads_without_cache_stay_absent() {
    let h = Harness::new();

    let report = h.sync().await;

    assert!(report.symptoms.has_no_measurements());
    let stored = h.store.get("symptoms_2025-10-03").unwrap().unwrap();
    assert!(!stored.contains("-1"));
}

#[tokio::test]
async fn fresh_reads_win_over_override_and_cache() {
    let h = Harness::new();
    h.provider.push_record(heart_rate(70.0, 8));
    h.provider.push_record(steps(5000));
    h.seed(
        day(),
        Symptoms {
            pulse: Some(90.0),
            steps: Some(100),
            ..Default::default()
        },
    );

    let report = h
        .engine
        .sync_day(
            day(),
            SymptomOverrides::default().with_pulse(55.0).with_steps(1),
        )
        .await
        .unwrap();

    assert_eq!(report.symptoms.pulse, Some(70.0));
    assert_eq!(report.symptoms.steps, Some(5000));
    assert_eq!(report.sources.pulse, FieldSource::Fresh);
}

#[tokio::test]
async fn override_fills_unavailable_fresh_read() {
    let h = Harness::new();
    h.seed(
        day(),
        Symptoms {
            sleep_hours: Some(6.0),
            ..Default::default()
        },
    );

    let report = h
        .engine
        .sync_day(day(), SymptomOverrides::default().with_sleep_hours(7.5))
        .await
        .unwrap();

    assert_eq!(report.symptoms.sleep_hours, Some(7.5));
    assert_eq!(report.sources.sleep_hours, FieldSource::Override);
}

#[tokio::test]
async fn repeated_cycles_are_idempotent() {
    let h = Harness::new();
    h.provider.push_record(heart_rate(72.0, 9));
    h.provider.push_record(steps(2400));

    let first = h.sync().await;
    assert!(h.cached(day()).is_synced);

    let second = h.sync().await;
    assert!(h.cached(day()).is_synced);

    assert_eq!(first.symptoms, second.symptoms);
    assert_eq!(h.cached(day()).symptoms, second.symptoms);
    assert_eq!(h.remote.calls().len(), 2);
}

#[tokio::test]
async fn stale_days_are_purged() {
    let h = Harness::new();
    let yesterday = day().pred_opt().unwrap();
    let last_week = day() - ChronoDuration::days(7);
    h.seed(yesterday, Symptoms::default());
    h.seed(last_week, Symptoms::default());
    h.store.set("session_token", "abc").unwrap();

    let report = h.sync().await;

    assert_eq!(h.cache().list_keys().unwrap(), vec!["symptoms_2025-10-03"]);
    assert_eq!(report.purged_keys.len(), 2);
    assert_eq!(h.store.get("session_token").unwrap().as_deref(), Some("abc"));
}

#[tokio::test]
async fn hanging_read_resolves_to_fallback() {
    let h = Harness::with_settings(SyncSettings {
        read_timeout: Duration::from_millis(100),
        ..SyncSettings::default()
    });
    h.provider.hang(RecordType::HeartRate);
    h.provider.push_record(steps(800));
    h.seed(
        day(),
        Symptoms {
            pulse: Some(66.0),
            ..Default::default()
        },
    );

    let started = std::time::Instant::now();
    let report = h.sync().await;
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_millis(1000), "took {:?}", elapsed);
    assert_eq!(report.symptoms.pulse, Some(66.0));
    assert_eq!(report.symptoms.steps, Some(800));
    assert!(report.outcome.is_synced());
}

#[tokio::test]
async fn cached_sessions_survive_empty_device_list() {
    let h = Harness::new();
    h.provider.push_record(heart_rate(72.0, 9));
    h.seed(
        day(),
        Symptoms {
            steps: Some(4000),
            sleep_sessions: Some(vec![cached_session()]),
            ..Default::default()
        },
    );

    let report = h.sync().await;

    assert_eq!(report.symptoms.pulse, Some(72.0));
    assert_eq!(report.symptoms.steps, Some(4000));
    assert_eq!(report.symptoms.sleep_sessions, Some(vec![cached_session()]));
    assert_eq!(report.sources.sleep_sessions, FieldSource::Cached);
}

#[tokio::test]
async fn offline_cycle_caches_and_defers() {
    let h = Harness::new();
    h.connectivity.set_connected(false);
    h.provider.push_record(steps(1200));

    let report = h.sync().await;

    assert_eq!(report.outcome, SyncOutcome::Deferred);
    assert!(!report.visited(SyncState::PushingRemote));
    assert!(h.remote.calls().is_empty());
    assert_eq!(h.notifier.notices(), vec![Notice::SyncDeferred { day: day() }]);

    let cached = h.cached(day());
    assert!(!cached.is_synced);
    assert_eq!(cached.symptoms.steps, Some(1200));
}

#[tokio::test]
async fn successful_push_marks_synced() {
    let h = Harness::new();
    h.provider.push_record(steps(1200));

    let report = h.sync().await;

    assert_eq!(report.outcome, SyncOutcome::Synced);
    assert_eq!(
        report.states,
        vec![
            SyncState::Idle,
            SyncState::Reading,
            SyncState::Merging,
            SyncState::PersistingLocal,
            SyncState::CheckingConnectivity,
            SyncState::PushingRemote,
            SyncState::Done,
        ]
    );

    let cached = h.cached(day());
    assert!(cached.is_synced);
    assert_eq!(cached.symptoms, report.symptoms);

    let (pushed_day, body) = &h.remote.calls()[0];
    assert_eq!(*pushed_day, day());
    assert_eq!(body.steps, Some(1200));
}

#[tokio::test]
async fn server_metadata_is_adopted() {
    let h = Harness::new();
    h.provider.push_record(steps(1200));
    h.remote.respond_with(UpsertResponse {
        status: 200,
        symptoms: Some(Symptoms {
            id: Some("sym-1".into()),
            created_at: Some(at(12)),
            updated_at: Some(at(12)),
            ..Default::default()
        }),
    });

    h.sync().await;

    let cached = h.cached(day());
    assert_eq!(cached.symptoms.id.as_deref(), Some("sym-1"));
    assert_eq!(cached.symptoms.steps, Some(1200));
    assert!(cached.is_synced);
}

#[tokio::test]
async fn failed_push_leaves_record_unsynced() {
    let h = Harness::new();
    h.provider.push_record(steps(1200));
    h.remote.fail_with("connection reset");

    let report = h.sync().await;

    assert!(matches!(report.outcome, SyncOutcome::PushFailed { .. }));
    assert!(!h.cached(day()).is_synced);
}

#[tokio::test]
async fn non_200_response_leaves_record_unsynced() {
    let h = Harness::new();
    h.remote.respond_with(UpsertResponse::with_status(201));

    let report = h.sync().await;

    assert_eq!(report.outcome, SyncOutcome::Rejected { status: 201 });
    assert!(!h.cached(day()).is_synced);
}

#[tokio::test]
async fn two_sleep_sessions_total_two_hours() {
    let h = Harness::new();
    let t0 = at(1);
    let t1 = at(14);
    h.provider.push_record(sleep(t0, 5_400_000));
    h.provider.push_record(sleep(t1, 1_800_000));

    let report = h.sync().await;

    assert_eq!(report.symptoms.sleep_hours, Some(2.0));
    let sessions = report.symptoms.sleep_sessions.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].start, t1);
    assert_eq!(sessions[0].duration_hours, 0.5);
    assert_eq!(sessions[1].start, t0);
    assert_eq!(sessions[1].duration_hours, 1.5);
}

#[tokio::test]
async fn concurrent_triggers_share_one_cycle() {
    let h = Arc::new(Harness::new());
    h.provider.push_record(steps(300));
    *h.provider.init_delay.lock().unwrap() = Some(Duration::from_millis(100));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let h = h.clone();
            tokio::spawn(async move { h.sync().await })
        })
        .collect();

    let mut cycle_ids = Vec::new();
    for task in tasks {
        cycle_ids.push(task.await.unwrap().cycle_id);
    }

    cycle_ids.dedup();
    assert_eq!(cycle_ids.len(), 1);
    assert_eq!(h.remote.calls().len(), 1);
    assert_eq!(h.provider.init_calls(), 1);
}
