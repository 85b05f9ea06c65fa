//! Validated settings structures

use crate::schema::{
    RawConfig, RawConnectivityConfig, RawHealthConfig, RawRemoteConfig, RawStorageConfig,
    RawSyncConfig,
};
use healthsync_util::default_data_dir;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_millis(3000);
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "symptoms_";
pub const DEFAULT_CHECK_URL: &str = "https://connectivitycheck.gstatic.com/generate_204";

/// Validated settings ready for use
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub sync: SyncSettings,
    pub remote: RemoteSettings,
    pub connectivity: ConnectivitySettings,
    pub storage: StorageSettings,
    pub health: HealthSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            sync: SyncSettings::from_raw(raw.sync),
            remote: RemoteSettings::from_raw(raw.remote),
            connectivity: ConnectivitySettings::from_raw(raw.connectivity),
            storage: StorageSettings::from_raw(raw.storage),
            health: HealthSettings::from_raw(raw.health),
        }
    }
}

/// Sync cycle settings
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Deadline applied to each health metric read
    pub read_timeout: Duration,
    pub cache_key_prefix: String,
}

impl SyncSettings {
    fn from_raw(raw: RawSyncConfig) -> Self {
        Self {
            read_timeout: raw
                .read_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_READ_TIMEOUT),
            cache_key_prefix: raw
                .cache_key_prefix
                .unwrap_or_else(|| DEFAULT_CACHE_KEY_PREFIX.to_string()),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_raw(RawSyncConfig::default())
    }
}

/// Remote endpoint settings
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// None disables pushing
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
}

impl RemoteSettings {
    fn from_raw(raw: RawRemoteConfig) -> Self {
        Self {
            base_url: raw.base_url.map(|u| u.trim_end_matches('/').to_string()),
            auth_token: raw.auth_token,
            request_timeout: raw
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self::from_raw(RawRemoteConfig::default())
    }
}

/// Connectivity probe settings
#[derive(Debug, Clone)]
pub struct ConnectivitySettings {
    pub check_url: String,
    pub check_timeout: Duration,
}

impl ConnectivitySettings {
    fn from_raw(raw: RawConnectivityConfig) -> Self {
        Self {
            check_url: raw
                .check_url
                .unwrap_or_else(|| DEFAULT_CHECK_URL.to_string()),
            check_timeout: raw
                .check_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CHECK_TIMEOUT),
        }
    }
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self::from_raw(RawConnectivityConfig::default())
    }
}

/// Local storage settings
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl StorageSettings {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::from_raw(RawStorageConfig::default())
    }
}

/// Health data source settings
#[derive(Debug, Clone, Default)]
pub struct HealthSettings {
    pub export_path: Option<PathBuf>,
}

impl HealthSettings {
    fn from_raw(raw: RawHealthConfig) -> Self {
        Self {
            export_path: raw.export_path,
        }
    }
}
