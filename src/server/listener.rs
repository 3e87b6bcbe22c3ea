// Listener module
// Creates TCP listeners and walks the preferred/fallback port list

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::logger;

/// Listen backlog queue size
const BACKLOG: i32 = 128;

/// Create a non-blocking `TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` is set on Unix so a port in `TIME_WAIT` can be reused.
/// `SO_REUSEPORT` stays off: a port held by another live listener must
/// fail with `AddrInUse`.
pub fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

/// Bind the preferred port, falling back through `fallback_ports` in order.
///
/// Only `AddrInUse` moves on to the next port; any other bind error is
/// fatal immediately.
pub fn bind_with_fallback(config: &ServerConfig) -> Result<TcpListener, StartupError> {
    let mut attempted = Vec::with_capacity(1 + config.fallback_ports.len());

    for addr in config.candidate_addrs() {
        attempted.push(addr.port());
        match create_listener(addr) {
            Ok(listener) => {
                if attempted.len() > 1 {
                    logger::log_info(&format!("Bound fallback port {}", addr.port()));
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => logger::log_port_in_use(&addr),
            Err(source) => return Err(StartupError::Bind { addr, source }),
        }
    }

    Err(StartupError::PortsExhausted {
        host: config.bind_address,
        attempted,
    })
}
