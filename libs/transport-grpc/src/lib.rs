#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
//! Transport plumbing shared by the glossary gRPC server and its clients.
//!
//! - [`client`]: endpoint construction, eager and lazy channels
//! - [`rpc_retry`]: retries for idempotent unary calls
//! - [`server`]: TCP serve loop with cooperative shutdown and a request bound

pub mod client;
pub mod rpc_retry;
pub mod server;

/// Normalize a `host:port` address into a URI tonic can dial.
///
/// Addresses that already carry a scheme are returned unchanged.
#[must_use]
pub fn normalize_endpoint(addr: &str) -> String {
    let trimmed = addr.trim();
    if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    }
}
