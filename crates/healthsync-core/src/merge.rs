//! Merge resolver
//!
//! Each field is resolved on its own: a fresh device value wins, then an
//! explicit override, then whatever the cache held for today. A record can
//! therefore mix a fresh pulse with a cached step count.

use healthsync_api::{Reading, SleepSession, SymptomOverrides, Symptoms};
use serde::{Deserialize, Serialize};

/// Where a resolved field came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Fresh,
    Override,
    Cached,
    Absent,
}

/// Freshly read device values for the stored metrics
#[derive(Debug, Clone, PartialEq)]
pub struct FreshReadings {
    pub pulse: Reading<f64>,
    pub steps: Reading<u64>,
    pub active_calories_burned: Reading<f64>,
    pub sleep_hours: Reading<f64>,
    pub sleep_sessions: Reading<Vec<SleepSession>>,
}

impl FreshReadings {
    /// Nothing available from the device
    pub fn none() -> Self {
        Self {
            pulse: Reading::no_data(),
            steps: Reading::no_data(),
            active_calories_burned: Reading::no_data(),
            sleep_hours: Reading::no_data(),
            sleep_sessions: Reading::no_data(),
        }
    }
}

/// Per-field provenance of a resolved record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSources {
    pub pulse: FieldSource,
    pub steps: FieldSource,
    pub active_calories_burned: FieldSource,
    pub sleep_hours: FieldSource,
    pub sleep_sessions: FieldSource,
}

/// Result of a merge
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub symptoms: Symptoms,
    pub sources: FieldSources,
}

/// Resolve today's record from device values, overrides and the cache
pub fn resolve(
    fresh: FreshReadings,
    overrides: &SymptomOverrides,
    cached: Option<&Symptoms>,
) -> Resolved {
    let (pulse, pulse_src) = pick(fresh.pulse, overrides.pulse, cached.and_then(|c| c.pulse));
    let (steps, steps_src) = pick(fresh.steps, overrides.steps, cached.and_then(|c| c.steps));
    let (active_calories_burned, calories_src) = pick(
        fresh.active_calories_burned,
        overrides.active_calories_burned,
        cached.and_then(|c| c.active_calories_burned),
    );
    let (sleep_hours, sleep_hours_src) = pick(
        fresh.sleep_hours,
        overrides.sleep_hours,
        cached.and_then(|c| c.sleep_hours),
    );

    // Sessions: an empty list counts as unavailable at the fresh and override tiers.
    let fresh_sessions = match fresh.sleep_sessions {
        Reading::Value(s) if s.is_empty() => Reading::no_data(),
        other => other,
    };
    let override_sessions = overrides.sleep_sessions.clone().filter(|s| !s.is_empty());
    let (sleep_sessions, sessions_src) = pick(
        fresh_sessions,
        override_sessions,
        cached.and_then(|c| c.sleep_sessions.clone()),
    );

    let symptoms = Symptoms {
        id: cached.and_then(|c| c.id.clone()),
        pulse,
        steps,
        active_calories_burned,
        sleep_hours,
        sleep_sessions,
        created_at: cached.and_then(|c| c.created_at),
        updated_at: cached.and_then(|c| c.updated_at),
    };

    Resolved {
        symptoms,
        sources: FieldSources {
            pulse: pulse_src,
            steps: steps_src,
            active_calories_burned: calories_src,
            sleep_hours: sleep_hours_src,
            sleep_sessions: sessions_src,
        },
    }
}

fn pick<T>(fresh: Reading<T>, override_value: Option<T>, cached: Option<T>) -> (Option<T>, FieldSource) {
    if let Reading::Value(v) = fresh {
        return (Some(v), FieldSource::Fresh);
    }
    if let Some(v) = override_value {
        return (Some(v), FieldSource::Override);
    }
    match cached {
        Some(v) => (Some(v), FieldSource::Cached),
        None => (None, FieldSource::Absent),
    }
}
