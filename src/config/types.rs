// Configuration types module
// Defines the on-disk / environment configuration layout

use serde::Deserialize;

/// Main configuration structure, as deserialized from file and environment
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerSection,
    pub site: SiteConfig,
    #[serde(default)]
    pub headers: HeadersConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listening socket configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Tried in order when `port` is already in use
    #[serde(default)]
    pub fallback_ports: Vec<u16>,
    pub workers: Option<usize>,
}

/// What to serve and how unmatched paths are handled
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub root_dir: String,
    pub spa_fallback: bool,
    pub spa_target: String,
    /// Requests under this prefix are resolved as plain files and never
    /// rewritten to the SPA target
    #[serde(default)]
    pub api_prefix: Option<String>,
    pub index_files: Vec<String>,
}

/// Response headers injected into every response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HeadersConfig {
    /// Named presets (`cors`, `no_cache`, `security`), applied first
    #[serde(default)]
    pub presets: Vec<String>,
    /// Explicit entries, applied after presets in declared order
    #[serde(default)]
    pub custom: Vec<HeaderEntry>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration (all durations in seconds)
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    pub shutdown_grace_period: u64,
}
