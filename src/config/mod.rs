// Configuration module entry point
// Loads file/environment configuration and turns it into a validated ServerConfig

mod headers;
mod server_config;
mod types;

pub use headers::HeaderSet;
pub use server_config::{ConnectionLimits, ServerConfig, DEFAULT_SPA_TARGET};
pub use types::{
    Config, HeaderEntry, HeadersConfig, LoggingConfig, PerformanceConfig, ServerSection,
    SiteConfig,
};

use crate::error::ConfigError;

/// Default config file name (without extension) when none is given
pub const DEFAULT_CONFIG_PATH: &str = "server";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `SPA__<SECTION>__<KEY>` environment variables
    /// override it, and a bare `PORT` overrides `server.port`. `server.port`
    /// and `site.root_dir` have no default and must come from one of them.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SPA")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.fallback_ports")
                    .with_list_parse_key("headers.presets")
                    .with_list_parse_key("site.index_files")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.fallback_ports", Vec::<i64>::new())?
            .set_default("site.spa_fallback", false)?
            .set_default("site.spa_target", DEFAULT_SPA_TARGET)?
            .set_default("site.index_files", vec!["index.html"])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace_period", 5)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Validate and convert into the immutable runtime configuration
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        ServerConfig::try_from(self)
    }
}
