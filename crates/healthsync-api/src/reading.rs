//! Outcome of a single health metric read

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a metric has no value for this cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Unavailable {
    /// The provider answered but had nothing in the window
    NoData,
    /// Read permission for the record type was not granted
    PermissionDenied,
    /// The provider could not be initialized
    NotInitialized,
    /// The read did not settle before its deadline
    TimedOut,
    /// The provider call failed
    Failed(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::NoData => write!(f, "no data"),
            Unavailable::PermissionDenied => write!(f, "permission denied"),
            Unavailable::NotInitialized => write!(f, "provider not initialized"),
            Unavailable::TimedOut => write!(f, "timed out"),
            Unavailable::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// A metric value, or the reason there isn't one
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Unavailable(Unavailable),
}

impl<T> Reading<T> {
    pub fn no_data() -> Self {
        Reading::Unavailable(Unavailable::NoData)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    /// True when the read itself went wrong, as opposed to finding nothing
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Reading::Unavailable(Unavailable::Failed(_) | Unavailable::TimedOut)
        )
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&Unavailable> {
        match self {
            Reading::Value(_) => None,
            Reading::Unavailable(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Reading::Value(v) => Reading::Value(f(v)),
            Reading::Unavailable(reason) => Reading::Unavailable(reason),
        }
    }

    /// Keep `self` if it holds a value, otherwise take `other`
    pub fn or(self, other: Reading<T>) -> Reading<T> {
        match self {
            Reading::Value(_) => self,
            Reading::Unavailable(_) => other,
        }
    }
}

impl<T> Reading<Vec<T>> {
    /// Collections signal "unavailable" by being empty
    pub fn from_collection(items: Vec<T>) -> Self {
        if items.is_empty() {
            Reading::no_data()
        } else {
            Reading::Value(items)
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reading::Value(v),
            None => Reading::no_data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_is_no_data() {
        let r: Reading<Vec<u8>> = Reading::from_collection(vec![]);
        assert_eq!(r, Reading::Unavailable(Unavailable::NoData));
        assert!(!r.is_failure());

        let r = Reading::from_collection(vec![1u8]);
        assert_eq!(r.into_value(), Some(vec![1]));
    }

    #[test]
    fn or_prefers_value() {
        let aggregate: Reading<u64> = Reading::Unavailable(Unavailable::TimedOut);
        let summed = Reading::Value(4200);
        assert_eq!(aggregate.or(summed), Reading::Value(4200));

        let aggregate = Reading::Value(5000u64);
        assert_eq!(aggregate.or(Reading::Value(4200)), Reading::Value(5000));
    }

    #[test]
    fn failures_are_distinguished_from_no_data() {
        let timed_out: Reading<f64> = Reading::Unavailable(Unavailable::TimedOut);
        let denied: Reading<f64> = Reading::Unavailable(Unavailable::PermissionDenied);
        assert!(timed_out.is_failure());
        assert!(!denied.is_failure());
        assert_eq!(denied.unavailable_reason(), Some(&Unavailable::PermissionDenied));
    }

    #[test]
    fn reason_serializes_with_tag() {
        let json = serde_json::to_value(Unavailable::Failed("boom".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "reason": "failed", "detail": "boom" }));
    }
}
