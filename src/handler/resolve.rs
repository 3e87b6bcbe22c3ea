//! Request path resolution
//!
//! Maps a raw request path onto a file under the site root:
//! percent-decoding, traversal rejection, index files and SPA fallback.
//! The containment check runs on the canonical path after joining, so
//! symlinks and encoding tricks cannot escape the root.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::ServerConfig;
use crate::error::RequestError;

/// Where a request ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The requested path names a file (or a directory with an index file)
    File(PathBuf),
    /// Nothing matched; the SPA target is served in its place
    SpaFallback(PathBuf),
}

impl Resolution {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(p) | Self::SpaFallback(p) => p,
        }
    }
}

/// Percent-decode a request path and reject traversal.
///
/// Both `/` and `\` count as separators, so `..\` is caught as well.
pub fn decode_path(raw: &str) -> Result<String, RequestError> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| RequestError::BadRequest(raw.to_string()))?
        .into_owned();

    if decoded.contains('\0') {
        return Err(RequestError::BadRequest(raw.to_string()));
    }
    if decoded.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(RequestError::PathTraversal(raw.to_string()));
    }
    Ok(decoded)
}

/// Join a decoded path onto the root, dropping empty and `.` segments
pub fn join_under_root(root: &Path, decoded: &str) -> PathBuf {
    decoded
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Resolve a decoded request path against the configuration
pub async fn resolve(config: &ServerConfig, decoded: &str) -> Result<Resolution, RequestError> {
    if let Some(path) = locate(config, decoded, &config.index_files).await? {
        return Ok(Resolution::File(path));
    }

    // API paths are a pass-through point: plain lookup, never rewritten
    if config.is_api_path(decoded) || !config.spa_fallback {
        return Err(RequestError::NotFound(decoded.to_string()));
    }

    match locate(config, &config.spa_target, &[]).await? {
        Some(path) => Ok(Resolution::SpaFallback(path)),
        None => Err(RequestError::NotFound(config.spa_target.clone())),
    }
}

/// Find a regular file for `decoded`, trying index files for directories
async fn locate(
    config: &ServerConfig,
    decoded: &str,
    index_files: &[String],
) -> Result<Option<PathBuf>, RequestError> {
    let candidate = join_under_root(&config.root_dir, decoded);

    let file = match fs::metadata(&candidate).await {
        Ok(meta) if meta.is_file() => candidate,
        Ok(meta) if meta.is_dir() => match find_index(&candidate, index_files).await {
            Some(index) => index,
            None => return Ok(None),
        },
        Ok(_) | Err(_) => return Ok(None),
    };

    let canonical = match fs::canonicalize(&file).await {
        Ok(path) => path,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(RequestError::Io { path: file, source }),
    };
    if !canonical.starts_with(&config.root_dir) {
        return Err(RequestError::PathTraversal(decoded.to_string()));
    }
    Ok(Some(canonical))
}

async fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for name in index_files {
        let path = dir.join(name);
        if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            return Some(path);
        }
    }
    None
}
