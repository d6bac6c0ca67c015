//! Privacy headers applied to every response.
//!
//! The bridge redirects shoppers to a third-party checkout; these headers
//! keep the frontend's domain out of outbound referrers and stop MIME
//! sniffing of the JSON endpoints. Layered over the whole router so routing
//! cannot bypass them.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS},
    },
    middleware::Next,
    response::Response,
};

/// Add privacy headers to all responses.
///
/// Headers applied:
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
pub async fn privacy_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    response
}
