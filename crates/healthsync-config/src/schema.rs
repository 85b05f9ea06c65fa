//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub sync: RawSyncConfig,

    #[serde(default)]
    pub remote: RawRemoteConfig,

    #[serde(default)]
    pub connectivity: RawConnectivityConfig,

    #[serde(default)]
    pub storage: RawStorageConfig,

    #[serde(default)]
    pub health: RawHealthConfig,
}

/// Sync cycle settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSyncConfig {
    /// Deadline for each health metric read (default: 5000)
    pub read_timeout_ms: Option<u64>,

    /// Prefix of local cache keys (default: "symptoms_")
    pub cache_key_prefix: Option<String>,
}

/// Remote symptoms endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRemoteConfig {
    /// API base URL; pushes are skipped when unset
    pub base_url: Option<String>,

    /// Bearer token sent with each upsert
    pub auth_token: Option<String>,

    /// Whole-request timeout (default: 10000)
    pub request_timeout_ms: Option<u64>,
}

/// Connectivity probe
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawConnectivityConfig {
    /// URL that answers 2xx/204 when the network is up
    pub check_url: Option<String>,

    /// Probe timeout (default: 3000)
    pub check_timeout_ms: Option<u64>,
}

/// Local storage
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory for the cache database
    pub data_dir: Option<PathBuf>,
}

/// Health data source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawHealthConfig {
    /// JSON export read by the desktop health provider
    pub export_path: Option<PathBuf>,
}
