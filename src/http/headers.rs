//! Response header injection
//!
//! The single point where the configured [`HeaderSet`] is applied. Every
//! response leaves the handler through [`inject`], whatever its status.

use hyper::Response;

use crate::config::HeaderSet;

/// Append configured headers after the transport headers already present.
///
/// Uses `append`, so a configured header never replaces one set by the
/// response builder and duplicate configured names are all kept.
pub fn inject<B>(mut response: Response<B>, headers: &HeaderSet) -> Response<B> {
    let map = response.headers_mut();
    for (name, value) in headers.iter() {
        map.append(name.clone(), value.clone());
    }
    response
}
