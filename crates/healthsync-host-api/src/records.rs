//! Raw health provider record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record types a health provider can be asked to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RecordType {
    HeartRate,
    Steps,
    ActiveCaloriesBurned,
    TotalCaloriesBurned,
    SleepSession,
}

impl RecordType {
    pub const ALL: [RecordType; 5] = [
        RecordType::HeartRate,
        RecordType::Steps,
        RecordType::ActiveCaloriesBurned,
        RecordType::TotalCaloriesBurned,
        RecordType::SleepSession,
    ];
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordType::HeartRate => "HeartRate",
            RecordType::Steps => "Steps",
            RecordType::ActiveCaloriesBurned => "ActiveCaloriesBurned",
            RecordType::TotalCaloriesBurned => "TotalCaloriesBurned",
            RecordType::SleepSession => "SleepSession",
        };
        f.write_str(name)
    }
}

/// A single heart rate measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSample {
    pub time: DateTime<Utc>,
    pub beats_per_minute: f64,
}

/// A raw record as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "recordType", rename_all = "PascalCase")]
pub enum HealthRecord {
    #[serde(rename_all = "camelCase")]
    HeartRate {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        samples: Vec<HeartRateSample>,
    },
    #[serde(rename_all = "camelCase")]
    Steps {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        count: u64,
    },
    #[serde(rename_all = "camelCase")]
    ActiveCaloriesBurned {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        kilocalories: f64,
    },
    #[serde(rename_all = "camelCase")]
    TotalCaloriesBurned {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        kilocalories: f64,
    },
    #[serde(rename_all = "camelCase")]
    SleepSession {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
}

impl HealthRecord {
    pub fn record_type(&self) -> RecordType {
        match self {
            HealthRecord::HeartRate { .. } => RecordType::HeartRate,
            HealthRecord::Steps { .. } => RecordType::Steps,
            HealthRecord::ActiveCaloriesBurned { .. } => RecordType::ActiveCaloriesBurned,
            HealthRecord::TotalCaloriesBurned { .. } => RecordType::TotalCaloriesBurned,
            HealthRecord::SleepSession { .. } => RecordType::SleepSession,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            HealthRecord::HeartRate { start_time, .. }
            | HealthRecord::Steps { start_time, .. }
            | HealthRecord::ActiveCaloriesBurned { start_time, .. }
            | HealthRecord::TotalCaloriesBurned { start_time, .. }
            | HealthRecord::SleepSession { start_time, .. } => *start_time,
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        match self {
            HealthRecord::HeartRate { end_time, .. }
            | HealthRecord::Steps { end_time, .. }
            | HealthRecord::ActiveCaloriesBurned { end_time, .. }
            | HealthRecord::TotalCaloriesBurned { end_time, .. }
            | HealthRecord::SleepSession { end_time, .. } => *end_time,
        }
    }
}

/// Provider-computed aggregate over a window.
/// Each field is `None` when the provider has no aggregate for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// `COUNT_TOTAL` for step records
    pub count_total: Option<u64>,
    /// `ENERGY_TOTAL` in kilocalories for calorie records
    pub energy_total_kcal: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_json_is_tagged_by_type() {
        let t = Utc.with_ymd_and_hms(2025, 4, 2, 7, 0, 0).unwrap();
        let record = HealthRecord::Steps {
            start_time: t,
            end_time: t,
            count: 250,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["recordType"], "Steps");
        assert_eq!(json["count"], 250);
        assert!(json.get("startTime").is_some());

        let parsed: HealthRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.record_type(), RecordType::Steps);
    }

    #[test]
    fn record_type_display_matches_serde_name() {
        for kind in RecordType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
