//! Shared configuration constants and environment helpers.

use std::path::PathBuf;

/// Environment variable names.
pub mod env_vars {
    /// openHAB base URL, e.g. `http://openhab:8080`.
    pub const BASE_URL: &str = "OPENHAB_BASE_URL";
    /// API token sent as a bearer token.
    pub const API_TOKEN: &str = "OPENHAB_API_TOKEN";
    /// Snapshot output directory.
    pub const OUTPUT_DIR: &str = "HABSNAP_OUTPUT_DIR";
    /// `true` switches log output to JSON.
    pub const LOG_JSON: &str = "HABSNAP_LOG_JSON";
}

/// Defaults.
pub mod defaults {
    pub const OUTPUT_DIR: &str = "./memory/openhab";
    pub const ROOT_TIMEOUT_SECS: u64 = 10;
    pub const ITEMS_TIMEOUT_SECS: u64 = 30;
    pub const FETCH_TIMEOUT_SECS: u64 = 20;
    pub const ITEMS_LINK: &str = "items";
}

/// Snapshot file names.
pub mod files {
    pub const REST_ROOT: &str = "rest_root.json";
    pub const INDEX: &str = "index.json";
    pub const RAW_ITEMS: &str = "items_raw.json";
}

/// Read a variable, treating empty values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Snapshot directory from the environment, or the default.
pub fn output_dir() -> PathBuf {
    env_non_empty(env_vars::OUTPUT_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_DIR))
}

/// Whether JSON log output was requested.
pub fn log_json() -> bool {
    env_non_empty(env_vars::LOG_JSON)
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Trim trailing slashes from a base URL.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
