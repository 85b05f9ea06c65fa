//! Store trait definitions

use crate::StoreResult;

/// String-keyed persistence over JSON-serialized values
pub trait KvStore: Send + Sync {
    /// Get a value; a missing key is `Ok(None)`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Every key currently stored
    fn all_keys(&self) -> StoreResult<Vec<String>>;

    /// Remove several keys at once; missing keys are ignored
    fn multi_remove(&self, keys: &[String]) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
