//! Single-flight coalescing
//!
//! Callers that ask for work on a key while that work is already running
//! wait for the running attempt and receive a clone of its result. The work
//! runs as its own task, so it completes and leaves the registry even when
//! every waiter has been cancelled.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

type Flight<V> = Shared<BoxFuture<'static, Result<V, String>>>;
type Registry<K, V> = Arc<Mutex<HashMap<K, Flight<V>>>>;

/// Deduplicates concurrent work per key
pub struct SingleFlight<K, V>
where
    V: Clone,
{
    inflight: Registry<K, V>,
}

/// Removes a key from the registry when the work task ends, panics included
struct Deregister<K: Eq + Hash, V: Clone> {
    registry: Registry<K, V>,
    key: Option<K>,
}

impl<K: Eq + Hash, V: Clone> Drop for Deregister<K, V> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&key);
        }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Join the in-flight work for `key`, or start it with `make`.
    /// Returns the result and whether this caller started the work.
    ///
    /// Must be called from within a tokio runtime. A panic in the work is
    /// resumed in every waiter.
    pub async fn run<F, Fut>(&self, key: K, make: F) -> (V, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let (flight, leader) = {
            let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            match inflight.get(&key) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let deregister = Deregister {
                        registry: self.inflight.clone(),
                        key: Some(key.clone()),
                    };
                    let work = make();
                    // Registry lock is held until the entry is inserted, so
                    // the task cannot deregister before it is registered.
                    let handle = tokio::spawn(async move {
                        let _deregister = deregister;
                        work.await
                    });
                    let flight = async move { handle.await.map_err(|e| e.to_string()) }
                        .boxed()
                        .shared();
                    inflight.insert(key, flight.clone());
                    (flight, true)
                }
            }
        };

        match flight.await {
            Ok(value) => (value, leader),
            Err(message) => panic!("single-flight work failed: {}", message),
        }
    }

    /// Number of keys with work in flight
    pub fn in_flight(&self) -> usize {
        self.inflight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
