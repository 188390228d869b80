//! Response relaying and error shapes.
//!
//! # Responsibilities
//! - Transform the upstream response for the original caller
//! - Strip headers that must not be relayed (Content-Encoding, hop-by-hop)
//! - Rewrite each Set-Cookie directive under the active cookie policy
//! - Produce the forwarder's own error responses (500 config, 502 gateway)
//!
//! # Design Decisions
//! - The upstream body streams through; only headers are touched
//! - Set-Cookie headers stay separate headers, one per directive
//! - Debug detail (backend URL, transport error) appears in the 502 body
//!   only outside production

use axum::body::Body;
use axum::http::{header, HeaderName, Response, StatusCode};
use axum::response::{IntoResponse, Json};
use serde_json::json;

use crate::config::Environment;
use crate::http::cookie::{rewrite_set_cookie, CookiePolicy};
use crate::http::server::ForwardError;

/// Headers never relayed from the upstream response.
///
/// `Content-Encoding` is stripped because the forwarder never advertises
/// `Accept-Encoding` upstream and re-serves the body bytes itself; relaying
/// the header would invite double-decoding. The rest are hop-by-hop.
const STRIPPED_RESPONSE_HEADERS: [HeaderName; 4] = [
    header::CONTENT_ENCODING,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
    header::SET_COOKIE, // re-emitted below after rewriting
];

/// Build the outbound response from an upstream reply.
///
/// Status and body pass through verbatim. Every Set-Cookie directive is
/// rewritten independently and appended as its own header, preserving the
/// upstream order.
pub fn relay_response(
    upstream: Response<hyper::body::Incoming>,
    policy: CookiePolicy,
) -> Response<Body> {
    let (parts, body) = upstream.into_parts();

    let mut relayed = Response::new(Body::new(body));
    *relayed.status_mut() = parts.status;

    let headers = relayed.headers_mut();
    for (name, value) in parts.headers.iter() {
        if STRIPPED_RESPONSE_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    for cookie in parts.headers.get_all(header::SET_COOKIE) {
        let rewritten = cookie
            .to_str()
            .ok()
            .map(|raw| rewrite_set_cookie(raw, policy))
            .and_then(|raw| raw.parse::<axum::http::HeaderValue>().ok());
        match rewritten {
            Some(value) => headers.append(header::SET_COOKIE, value),
            // Non-UTF-8 directive; relay as issued rather than drop it.
            None => headers.append(header::SET_COOKIE, cookie.clone()),
        };
    }

    relayed
}

/// 500 response for a deployment without `SERVER_URL`.
pub fn missing_upstream_response() -> Response<Body> {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "SERVER_URL is not configured." })),
    )
        .into_response()
}

/// 502 response for an unreachable upstream.
///
/// The `backendUrl` and `details` fields are emitted only outside production;
/// the backend host is not advertised to cross-site callers.
pub fn bad_gateway_response(
    error: &ForwardError,
    target: &str,
    environment: Environment,
) -> Response<Body> {
    let mut body = json!({
        "error": "Bad Gateway",
        "message": "The proxy could not connect to the backend.",
    });
    if !environment.is_production() {
        body["backendUrl"] = json!(target);
        body["details"] = json!(error.to_string());
    }
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}
