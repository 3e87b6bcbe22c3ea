//! Error types
//!
//! Startup errors are fatal and map to process exit codes.
//! Request errors are per-request and map to HTTP status codes.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

/// Invalid or unloadable configuration. Raised before any socket is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("root directory does not exist or is unreadable: {path}: {source}")]
    RootMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid response header '{name}: {value}'")]
    InvalidHeader { name: String, value: String },

    #[error("response header '{0}' repeats a non-adjacent entry; group its values together")]
    SplitHeader(String),

    #[error("unknown header preset '{0}' (expected cors, no_cache or security)")]
    UnknownPreset(String),

    #[error("SPA target must be an absolute URL path starting with '/': '{0}'")]
    InvalidSpaTarget(String),
}

/// Failure to bring the listening socket up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("all ports in use on {host}, attempted: {}", format_ports(.attempted))]
    PortsExhausted {
        host: std::net::IpAddr,
        attempted: Vec<u16>,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] io::Error),
}

fn format_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-request failure. Never affects server state.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request path: {0}")]
    BadRequest(String),

    #[error("path escapes site root: {0}")]
    PathTraversal(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RequestError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::PathTraversal(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
