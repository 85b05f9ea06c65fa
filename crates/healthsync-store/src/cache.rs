//! Per-day symptoms cache

use chrono::NaiveDate;
use healthsync_api::LocalSymptoms;
use healthsync_util::{format_day, parse_day};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{KvStore, StoreResult};

/// Local cache of `LocalSymptoms` envelopes keyed `<prefix><YYYY-MM-DD>`
#[derive(Clone)]
pub struct SymptomCache {
    store: Arc<dyn KvStore>,
    prefix: String,
}

impl SymptomCache {
    pub fn new(store: Arc<dyn KvStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Cache key for a calendar day
    pub fn key_for(&self, day: NaiveDate) -> String {
        format!("{}{}", self.prefix, format_day(day))
    }

    /// Day addressed by a cache key, if the key follows the scheme
    pub fn day_of(&self, key: &str) -> Option<NaiveDate> {
        key.strip_prefix(&self.prefix).and_then(parse_day)
    }

    /// Read the envelope for a day. Missing and malformed entries are `None`.
    pub fn read(&self, day: NaiveDate) -> StoreResult<Option<LocalSymptoms>> {
        let key = self.key_for(day);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<LocalSymptoms>(&raw) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => {
                warn!(key = %key, error = %e, "Malformed cache entry, treating as absent");
                Ok(None)
            }
        }
    }

    /// Write the envelope for a day
    pub fn write(&self, day: NaiveDate, envelope: &LocalSymptoms) -> StoreResult<()> {
        let key = self.key_for(day);
        let json = serde_json::to_string(envelope)?;
        self.store.set(&key, &json)?;

        debug!(key = %key, is_synced = envelope.is_synced, "Cache entry written");
        Ok(())
    }

    /// Keys that follow the `<prefix><YYYY-MM-DD>` scheme
    pub fn list_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .store
            .all_keys()?
            .into_iter()
            .filter(|k| self.day_of(k).is_some())
            .collect())
    }

    pub fn delete_many(&self, keys: &[String]) -> StoreResult<()> {
        self.store.multi_remove(keys)
    }

    /// Remove every dated entry except the one for `keep`. Returns removed keys.
    pub fn purge_except(&self, keep: NaiveDate) -> StoreResult<Vec<String>> {
        let stale: Vec<String> = self
            .list_keys()?
            .into_iter()
            .filter(|k| self.day_of(k) != Some(keep))
            .collect();

        if !stale.is_empty() {
            self.delete_many(&stale)?;
            debug!(count = stale.len(), keep = %keep, "Stale cache entries purged");
        }

        Ok(stale)
    }
}
