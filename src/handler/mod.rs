//! Request handler module
//!
//! Turns an inbound request into a response: path resolution with
//! traversal protection, SPA fallback, file serving and header injection.

pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
