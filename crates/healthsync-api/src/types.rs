//! Shared record types

use chrono::{DateTime, Utc};
use healthsync_util::hours_between;
use serde::{Deserialize, Serialize};

/// A single sleep interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Derived from `end - start`, two-decimal precision
    pub duration_hours: f64,
}

impl SleepSession {
    /// Build a session, deriving its duration from the bounds
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_hours: hours_between(start, end),
        }
    }
}

/// One calendar day of health metrics for the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptoms {
    /// Server-assigned, absent until the first successful upsert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Most recent heart rate reading (beats/min)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse: Option<f64>,

    /// Step count for the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,

    /// Kilocalories from active energy expenditure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_calories_burned: Option<f64>,

    /// Total sleep duration in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,

    /// Individual sleep intervals, most recent first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_sessions: Option<Vec<SleepSession>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Symptoms {
    /// True when no measurement field is set (metadata is ignored)
    pub fn has_no_measurements(&self) -> bool {
        self.pulse.is_none()
            && self.steps.is_none()
            && self.active_calories_burned.is_none()
            && self.sleep_hours.is_none()
            && self.sleep_sessions.is_none()
    }

    /// Copy server-assigned metadata from an upsert response
    pub fn adopt_server_metadata(&mut self, server: &Symptoms) {
        if server.id.is_some() {
            self.id = server.id.clone();
        }
        if server.created_at.is_some() {
            self.created_at = server.created_at;
        }
        if server.updated_at.is_some() {
            self.updated_at = server.updated_at;
        }
    }
}

/// Local cache envelope, one per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSymptoms {
    pub symptoms: Symptoms,
    /// True only after the remote upsert of this exact envelope returned 200
    pub is_synced: bool,
}

impl LocalSymptoms {
    pub fn unsynced(symptoms: Symptoms) -> Self {
        Self {
            symptoms,
            is_synced: false,
        }
    }

    pub fn synced(symptoms: Symptoms) -> Self {
        Self {
            symptoms,
            is_synced: true,
        }
    }
}

/// Request body of the remote upsert endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSymptoms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_calories_burned: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_sessions: Option<Vec<SleepSession>>,
}

impl From<&Symptoms> for UpdateSymptoms {
    fn from(s: &Symptoms) -> Self {
        Self {
            pulse: s.pulse,
            steps: s.steps,
            active_calories_burned: s.active_calories_burned,
            sleep_hours: s.sleep_hours,
            sleep_sessions: s.sleep_sessions.clone(),
        }
    }
}

/// Values explicitly supplied by the user for a sync cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomOverrides {
    pub pulse: Option<f64>,
    pub steps: Option<u64>,
    pub active_calories_burned: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub sleep_sessions: Option<Vec<SleepSession>>,
}

impl SymptomOverrides {
    pub fn is_empty(&self) -> bool {
        self.pulse.is_none()
            && self.steps.is_none()
            && self.active_calories_burned.is_none()
            && self.sleep_hours.is_none()
            && self.sleep_sessions.as_ref().is_none_or(|s| s.is_empty())
    }

    pub fn with_pulse(mut self, pulse: f64) -> Self {
        self.pulse = Some(pulse);
        self
    }

    pub fn with_steps(mut self, steps: u64) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_active_calories(mut self, kcal: f64) -> Self {
        self.active_calories_burned = Some(kcal);
        self
    }

    pub fn with_sleep_hours(mut self, hours: f64) -> Self {
        self.sleep_hours = Some(hours);
        self
    }

    pub fn with_sleep_sessions(mut self, sessions: Vec<SleepSession>) -> Self {
        self.sleep_sessions = Some(sessions);
        self
    }
}
