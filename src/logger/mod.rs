//! Logger module
//!
//! Operator-visible logging for the server:
//! - Startup and shutdown lifecycle lines
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Nothing here returns an error to callers on the request path.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use std::sync::OnceLock;

use crate::config::{LoggingConfig, ServerConfig};

/// Severity threshold for non-access messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a configured level; unknown values fall back to `Info`
    pub fn parse(level: &str) -> Self {
        match level.to_ascii_lowercase().as_str() {
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

struct Settings {
    level: Level,
    access_log: bool,
    access_log_format: String,
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Without it, messages go
/// to stdout/stderr and access lines use the `combined` format.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )?;
    let _ = SETTINGS.set(Settings {
        level: Level::parse(&config.level),
        access_log: config.access_log,
        access_log_format: config.access_log_format.clone(),
    });
    Ok(())
}

fn enabled(level: Level) -> bool {
    SETTINGS.get().map_or(true, |s| level >= s.level)
}

fn write_info(message: &str) {
    if !enabled(Level::Info) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_info(message),
        None => writer::stdout_line(message),
    }
}

fn write_error(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_error(message),
        None => writer::stderr_line(message),
    }
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_server_start(addr: &SocketAddr, config: &ServerConfig) {
    write_info("======================================");
    write_info("Static asset server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Serving: {}", config.root_dir.display()));
    if config.spa_fallback {
        write_info(&format!("SPA fallback: {}", config.spa_target));
    }
    if let Some(prefix) = &config.api_prefix {
        write_info(&format!("API pass-through prefix: {prefix}"));
    }
    if !config.headers.is_empty() {
        write_info(&format!("Injected headers: {}", config.headers.len()));
    }
    write_info("======================================");
}

pub fn log_port_in_use(addr: &SocketAddr) {
    log_warning(&format!("Port {} already in use on {}", addr.port(), addr.ip()));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    log_error(&format!("Failed to serve connection: {err}"));
}

pub fn log_shutdown_started(grace: std::time::Duration) {
    write_info(&format!(
        "[SHUTDOWN] Stopped accepting connections, waiting up to {}s for in-flight requests",
        grace.as_secs()
    ));
}

pub fn log_shutdown_complete(drained: bool) {
    if drained {
        write_info("[SHUTDOWN] All connections closed");
    } else {
        write_info("[SHUTDOWN] Grace period elapsed, dropping remaining connections");
    }
}

/// Write one access log line, if access logging is enabled
pub fn log_access(entry: &AccessLogEntry) {
    let (on, format) = SETTINGS
        .get()
        .map_or((true, "combined"), |s| (s.access_log, s.access_log_format.as_str()));
    if !on {
        return;
    }
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => writer::stdout_line(&line),
    }
}
