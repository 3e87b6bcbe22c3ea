//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution, file serving, header injection and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use crate::config::ServerConfig;
use crate::error::RequestError;
use crate::handler::resolve::{self, Resolution};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Per-request transient state, extracted up front so the request body
/// is not held across file I/O
pub struct RequestContext {
    pub method: Method,
    /// Raw path as received, before decoding
    pub path: String,
    pub is_head: bool,
    pub http_version: &'static str,
    pub remote_addr: SocketAddr,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub started: Instant,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>, remote_addr: SocketAddr) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            is_head: req.method() == Method::HEAD,
            http_version: match req.version() {
                hyper::Version::HTTP_10 => "1.0",
                _ => "1.1",
            },
            remote_addr,
            referer: header("referer"),
            user_agent: header("user-agent"),
            started: Instant::now(),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Never fails: every outcome, including errors, becomes a response that
/// carries the configured header set.
pub async fn handle_request<B>(
    req: Request<B>,
    config: Arc<ServerConfig>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let ctx = RequestContext::from_request(&req, remote_addr);
    drop(req);

    let response = match ctx.method {
        Method::GET | Method::HEAD => match serve(&ctx, &config).await {
            Ok(resp) => resp,
            Err(err) => error_response(&err, ctx.is_head),
        },
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", ctx.method));
            http::build_405_response()
        }
    };

    let response = http::inject(response, &config.headers);
    log_access(&ctx, &response);
    Ok(response)
}

/// Resolve and serve a GET/HEAD request
async fn serve(
    ctx: &RequestContext,
    config: &ServerConfig,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let decoded = resolve::decode_path(&ctx.path)?;
    let resolution = resolve::resolve(config, &decoded).await?;
    if let Resolution::SpaFallback(_) = &resolution {
        // Server-side rewrite, the client URL stays as requested
        logger::log_info(&format!("SPA fallback: {} -> {}", ctx.path, config.spa_target));
    }
    static_files::serve_file(resolution.path(), ctx.is_head).await
}

fn error_response(err: &RequestError, is_head: bool) -> Response<Full<Bytes>> {
    match err {
        RequestError::NotFound(_) => {}
        RequestError::BadRequest(_) | RequestError::PathTraversal(_) => {
            logger::log_warning(&format!("Rejected request: {err}"));
        }
        RequestError::Io { .. } => logger::log_error(&err.to_string()),
    }
    http::build_status_response(err.status(), is_head)
}

fn log_access(ctx: &RequestContext, response: &Response<Full<Bytes>>) {
    let mut entry = AccessLogEntry::new(
        ctx.remote_addr.to_string(),
        ctx.method.to_string(),
        ctx.path.clone(),
    );
    entry.http_version = ctx.http_version.to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer.clone_from(&ctx.referer);
    entry.user_agent.clone_from(&ctx.user_agent);
    entry.request_time_us = u64::try_from(ctx.started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry);
}
