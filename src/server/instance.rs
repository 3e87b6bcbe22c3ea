// Server instance module
// Owns the bound listener and runs the accept loop until shutdown

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::connection::accept_connection;
use super::listener::bind_with_fallback;
use super::shutdown::{self, ShutdownHandle};
use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::logger;

/// Pause after a failed `accept` (e.g. file descriptor exhaustion)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// A bound, not yet running server
#[derive(Debug)]
pub struct ServerInstance {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: Arc<ServerConfig>,
}

impl ServerInstance {
    /// Bind the preferred or first free fallback port.
    ///
    /// On success the ready line is logged and [`Self::local_addr`] reports
    /// the effective endpoint.
    pub fn bind(config: ServerConfig) -> Result<Self, StartupError> {
        let listener = bind_with_fallback(&config)?;
        let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
            addr: SocketAddr::new(config.bind_address, config.port),
            source,
        })?;

        logger::log_server_start(&local_addr, &config);

        Ok(Self {
            listener,
            local_addr,
            config: Arc::new(config),
        })
    }

    /// The address actually bound
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `signal` resolves, then drain in-flight
    /// connections for up to the configured grace period.
    pub async fn serve_with_shutdown<F>(self, signal: F)
    where
        F: Future<Output = ()> + Send,
    {
        let Self {
            listener,
            config,
            ..
        } = self;
        let graceful = GracefulShutdown::new();
        let active_connections = Arc::new(AtomicUsize::new(0));

        tokio::pin!(signal);

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(
                                stream,
                                peer_addr,
                                &config,
                                &active_connections,
                                &graceful,
                            );
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        }
                    }
                }

                () = &mut signal => break,
            }
        }

        // Stop accepting before draining
        drop(listener);

        let grace = config.limits.shutdown_grace_period;
        logger::log_shutdown_started(grace);
        let drained = tokio::time::timeout(grace, graceful.shutdown()).await.is_ok();
        logger::log_shutdown_complete(drained);
    }

    /// Run on the current runtime in a background task
    pub fn spawn(self) -> RunningServer {
        let (handle, mut signal) = shutdown::channel();
        let local_addr = self.local_addr;
        let task = tokio::spawn(self.serve_with_shutdown(async move { signal.recv().await }));
        RunningServer {
            local_addr,
            handle,
            task,
        }
    }
}

/// A server running in a background task.
///
/// Dropping it without calling [`RunningServer::shutdown`] also stops the
/// accept loop, since the last shutdown handle goes away.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    handle: ShutdownHandle,
    task: JoinHandle<()>,
}

impl RunningServer {
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// A cloneable handle that can stop this server from elsewhere
    pub fn handle(&self) -> ShutdownHandle {
        self.handle.clone()
    }

    /// Request shutdown and wait for the drain to finish
    pub async fn shutdown(self) -> io::Result<()> {
        self.handle.shutdown();
        self.task.await.map_err(io::Error::other)
    }
}
