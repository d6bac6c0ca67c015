//! Middleware for the bridge.

mod privacy_headers;

pub use privacy_headers::privacy_headers_middleware;
