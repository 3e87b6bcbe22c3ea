// Runtime server configuration
// Immutable, validated settings shared read-only by every request handler

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::headers::HeaderSet;
use super::types::Config;
use crate::error::ConfigError;

pub const DEFAULT_SPA_TARGET: &str = "/index.html";

/// Connection-level tuning knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub keep_alive: bool,
    /// Upper bound for a whole connection (read + write)
    pub connection_timeout: Duration,
    pub max_connections: Option<usize>,
    /// How long in-flight connections may run after shutdown is requested
    pub shutdown_grace_period: Duration,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            keep_alive: true,
            connection_timeout: Duration::from_secs(30),
            max_connections: None,
            shutdown_grace_period: Duration::from_secs(5),
        }
    }
}

/// Validated startup configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Canonical absolute path of the site root
    pub root_dir: PathBuf,
    pub bind_address: IpAddr,
    pub port: u16,
    pub fallback_ports: Vec<u16>,
    pub headers: HeaderSet,
    pub spa_fallback: bool,
    pub spa_target: String,
    pub api_prefix: Option<String>,
    pub index_files: Vec<String>,
    pub limits: ConnectionLimits,
}

impl ServerConfig {
    /// Create a configuration with defaults for everything but root and port.
    ///
    /// Fails if `root_dir` is missing or not a directory.
    pub fn new(root_dir: impl AsRef<Path>, port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            root_dir: validate_root(root_dir.as_ref())?,
            bind_address: IpAddr::from([0, 0, 0, 0]),
            port,
            fallback_ports: Vec::new(),
            headers: HeaderSet::new(),
            spa_fallback: false,
            spa_target: DEFAULT_SPA_TARGET.to_string(),
            api_prefix: None,
            index_files: vec!["index.html".to_string()],
            limits: ConnectionLimits::default(),
        })
    }

    #[must_use]
    pub const fn with_bind_address(mut self, addr: IpAddr) -> Self {
        self.bind_address = addr;
        self
    }

    #[must_use]
    pub fn with_fallback_ports(mut self, ports: impl Into<Vec<u16>>) -> Self {
        self.fallback_ports = ports.into();
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }

    /// Enable SPA fallback to the given target path
    pub fn with_spa_fallback(mut self, target: &str) -> Result<Self, ConfigError> {
        self.spa_target = validate_spa_target(target)?;
        self.spa_fallback = true;
        Ok(self)
    }

    #[must_use]
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: ConnectionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Preferred address followed by every fallback, in attempt order
    pub fn candidate_addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        std::iter::once(self.port)
            .chain(self.fallback_ports.iter().copied())
            .map(|port| SocketAddr::new(self.bind_address, port))
    }

    /// Whether the decoded request path falls under the API pass-through prefix
    pub fn is_api_path(&self, path: &str) -> bool {
        self.api_prefix
            .as_deref()
            .is_some_and(|prefix| !prefix.is_empty() && path.starts_with(prefix))
    }
}

impl TryFrom<&Config> for ServerConfig {
    type Error = ConfigError;

    fn try_from(cfg: &Config) -> Result<Self, Self::Error> {
        let bind_address = cfg
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(cfg.server.host.clone()))?;

        let timeout = std::cmp::max(cfg.performance.read_timeout, cfg.performance.write_timeout);
        let limits = ConnectionLimits {
            keep_alive: cfg.performance.keep_alive,
            connection_timeout: Duration::from_secs(timeout),
            max_connections: cfg
                .performance
                .max_connections
                .map(|max| usize::try_from(max).unwrap_or(usize::MAX)),
            shutdown_grace_period: Duration::from_secs(cfg.performance.shutdown_grace_period),
        };

        Ok(Self {
            root_dir: validate_root(Path::new(&cfg.site.root_dir))?,
            bind_address,
            port: cfg.server.port,
            fallback_ports: cfg.server.fallback_ports.clone(),
            headers: HeaderSet::from_config(&cfg.headers)?,
            spa_fallback: cfg.site.spa_fallback,
            spa_target: validate_spa_target(&cfg.site.spa_target)?,
            api_prefix: cfg.site.api_prefix.clone().filter(|p| !p.is_empty()),
            index_files: cfg.site.index_files.clone(),
            limits,
        })
    }
}

/// Root must exist and be a directory; returns its canonical form
fn validate_root(root: &Path) -> Result<PathBuf, ConfigError> {
    let canonical = root.canonicalize().map_err(|source| ConfigError::RootMissing {
        path: root.to_path_buf(),
        source,
    })?;
    if !canonical.is_dir() {
        return Err(ConfigError::RootNotDirectory(canonical));
    }
    std::fs::read_dir(&canonical).map_err(|source| ConfigError::RootMissing {
        path: canonical.clone(),
        source,
    })?;
    Ok(canonical)
}

fn validate_spa_target(target: &str) -> Result<String, ConfigError> {
    if !target.starts_with('/') || target.split('/').any(|seg| seg == "..") {
        return Err(ConfigError::InvalidSpaTarget(target.to_string()));
    }
    Ok(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_is_config_error() {
        let err = ServerConfig::new("/definitely/not/here/for/sure", 8080).unwrap_err();
        assert!(matches!(err, ConfigError::RootMissing { .. }));
    }

    #[test]
    fn test_file_root_is_config_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ServerConfig::new(file.path(), 8080).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotDirectory(_)));
    }

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site");
        std::fs::create_dir(&nested).unwrap();
        let cfg = ServerConfig::new(nested.join("..").join("site"), 8080).unwrap();
        assert_eq!(cfg.root_dir, nested.canonicalize().unwrap());
        assert!(cfg.root_dir.is_absolute());
    }

    #[test]
    fn test_candidate_addrs_order() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(dir.path(), 4444)
            .unwrap()
            .with_bind_address("127.0.0.1".parse().unwrap())
            .with_fallback_ports([4445, 4446]);
        let ports: Vec<u16> = cfg.candidate_addrs().map(|a| a.port()).collect();
        assert_eq!(ports, [4444, 4445, 4446]);
    }

    #[test]
    fn test_spa_target_validation() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(dir.path(), 80).unwrap();
        assert!(cfg.clone().with_spa_fallback("/app.html").is_ok());
        assert!(cfg.clone().with_spa_fallback("index.html").is_err());
        assert!(cfg.with_spa_fallback("/../index.html").is_err());
    }

    #[test]
    fn test_api_prefix_match() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(dir.path(), 80)
            .unwrap()
            .with_api_prefix("/api/");
        assert!(cfg.is_api_path("/api/users"));
        assert!(!cfg.is_api_path("/apis"));
        assert!(!cfg.is_api_path("/"));
    }
}
