//! Static file serving module
//!
//! Reads a resolved file and builds its response.

use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::error::RequestError;
use crate::http::{self, mime};

/// Read a file and build a 200 response for it
///
/// A read failure here happens after the existence check (file removed
/// in between, permissions) and surfaces as [`RequestError::Io`].
pub async fn serve_file(path: &Path, is_head: bool) -> Result<Response<Full<Bytes>>, RequestError> {
    let content = fs::read(path).await.map_err(|source| RequestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(path),
        is_head,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_serve_file_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        let bytes: Vec<u8> = (0..=255).collect();
        std::fs::write(&path, &bytes).unwrap();

        let resp = serve_file(&path, false).await.unwrap();
        assert_eq!(resp.headers()["content-type"], "image/png");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), bytes.as_slice());
    }

    #[tokio::test]
    async fn test_serve_file_vanished() {
        let dir = tempfile::tempdir().unwrap();
        let err = serve_file(&dir.path().join("gone.html"), false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
