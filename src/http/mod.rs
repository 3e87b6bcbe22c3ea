//! HTTP protocol layer module
//!
//! Content-type inference, response builders and header injection,
//! decoupled from path resolution.

pub mod headers;
pub mod mime;
pub mod response;

pub use headers::inject;
pub use response::{build_405_response, build_file_response, build_status_response};
