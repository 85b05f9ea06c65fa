//! Timeout guard for provider calls
//!
//! The guarded operation runs as its own task. When the deadline wins, the
//! task is detached rather than aborted, so it may still run to completion
//! in the background; its late result goes nowhere.

use healthsync_api::{Reading, Unavailable};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How a guarded operation settled
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<T> {
    /// The operation finished before the deadline
    Settled(T),
    /// The operation failed before the deadline; `fallback` replaces it
    Failed { fallback: T, error: String },
    /// The deadline elapsed first; `fallback` replaces it
    TimedOut(T),
}

impl<T> Guarded<T> {
    pub fn into_inner(self) -> T {
        match self {
            Guarded::Settled(v) => v,
            Guarded::Failed { fallback, .. } => fallback,
            Guarded::TimedOut(v) => v,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, Guarded::TimedOut(_))
    }
}

/// Run `operation` with a deadline, substituting `fallback` on error or expiry.
/// Errors are never propagated.
pub async fn with_deadline<T, E, F>(operation: F, deadline: Duration, fallback: T) -> Guarded<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(Ok(value))) => Guarded::Settled(value),
        Ok(Ok(Err(e))) => Guarded::Failed {
            fallback,
            error: e.to_string(),
        },
        Ok(Err(join_err)) => Guarded::Failed {
            fallback,
            error: join_err.to_string(),
        },
        Err(_) => {
            debug!(deadline_ms = deadline.as_millis() as u64, "Guarded operation timed out");
            Guarded::TimedOut(fallback)
        }
    }
}

/// Bound a metric read. Expiry becomes `Unavailable(TimedOut)`.
pub async fn read_with_deadline<T, F>(read: F, deadline: Duration) -> Reading<T>
where
    F: Future<Output = Reading<T>> + Send + 'static,
    T: Send + 'static,
{
    let infallible = async move { Ok::<_, std::convert::Infallible>(read.await) };

    match with_deadline(infallible, deadline, Reading::Unavailable(Unavailable::TimedOut)).await {
        Guarded::Settled(reading) => reading,
        Guarded::Failed { error, .. } => Reading::Unavailable(Unavailable::Failed(error)),
        Guarded::TimedOut(fallback) => fallback,
    }
}
