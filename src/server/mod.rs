// Server module entry point
// Listener binding with port fallback, connection serving and shutdown

pub mod connection;
pub mod instance;
pub mod listener;
pub mod shutdown;
pub mod signal;

pub use instance::{RunningServer, ServerInstance};
pub use listener::{bind_with_fallback, create_listener};
pub use shutdown::{ShutdownHandle, ShutdownSignal};
pub use signal::shutdown_signal;
