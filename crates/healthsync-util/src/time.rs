//! Time utilities for healthsync
//!
//! Provides the wall clock used to decide which calendar day is "today",
//! the local-day read window every health query defaults to, and the
//! rounding applied to hour values.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `HEALTHSYNC_MOCK_TIME` environment variable can be
//! set to override the system time. This is useful for exercising day
//! rollover and stale-key cleanup without waiting for midnight.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)

use chrono::{
    DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "HEALTHSYNC_MOCK_TIME";

/// Date format used for cache keys and the remote `date` query parameter
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Offset between mock time and real time when the process started.
static MOCK_TIME_OFFSET: OnceLock<Option<ChronoDuration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<ChronoDuration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S")
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = "%Y-%m-%d %H:%M:%S",
                    "Invalid mock time format"
                );
                return None;
            };
            let mock_dt = local_from_naive(naive_dt);
            let offset = mock_dt.signed_duration_since(chrono::Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Today's calendar date in local time
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).ok()
}

/// Round to two decimal places (hour values)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hours between two instants, rounded to two decimals.
/// Not clamped: callers assume `end >= start`.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = end.signed_duration_since(start).num_milliseconds();
    round2(millis as f64 / 3_600_000.0)
}

/// Resolve a naive local datetime, picking the earlier instant on DST overlap
/// and falling back to interpreting it as UTC inside a DST gap.
fn local_from_naive(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Time bounds for a health provider query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReadWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The local calendar day: 00:00:00.000 to 23:59:59.999
    pub fn for_day(day: NaiveDate) -> Self {
        let start = local_from_naive(day.and_time(NaiveTime::MIN));
        let end_of_day =
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        let end = local_from_naive(day.and_time(end_of_day));

        Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }

    /// Window covering today in local time
    pub fn today() -> Self {
        Self::for_day(today())
    }

    /// Check whether an instant falls inside the window (inclusive)
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// ISO 8601 start bound, as handed to providers
    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339()
    }

    /// ISO 8601 end bound, as handed to providers
    pub fn end_iso(&self) -> String {
        self.end.to_rfc3339()
    }
}
