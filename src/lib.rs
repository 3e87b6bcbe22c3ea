//! Static asset HTTP server with SPA-fallback routing, ordered response
//! header injection and port-fallback startup.
//!
//! ```no_run
//! use spa_static_server::config::ServerConfig;
//! use spa_static_server::server::ServerInstance;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::new("/srv/site", 4444)?
//!     .with_fallback_ports([4445, 4446])
//!     .with_spa_fallback("/index.html")?;
//! let server = ServerInstance::bind(config)?;
//! println!("ready on {}", server.local_addr());
//! server.serve_with_shutdown(spa_static_server::server::shutdown_signal()).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::{HeaderSet, ServerConfig};
pub use crate::error::{ConfigError, RequestError, StartupError};
pub use crate::server::{RunningServer, ServerInstance, ShutdownHandle};
