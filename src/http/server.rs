//! HTTP server setup and the forwarding handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the wildcard capture route
//! - Wire up middleware (tracing, request ID)
//! - Bind the server to a listener with graceful shutdown
//! - Map each inbound request to exactly one upstream URL
//! - Replay method/cookie/body against the upstream and relay the reply
//! - Translate transport failures into the 502 shape
//!
//! # Design Decisions
//! - Path mapping is pass-through: inbound path + query are appended to the
//!   upstream base origin unchanged, with no prefix manipulation
//! - One inbound request maps to exactly one upstream attempt; no retries
//! - Only the Cookie header crosses to the upstream; host-runtime headers
//!   (forwarded-for chains, platform auth) never leak to the backend
//! - The upstream call carries its own timeout so expiry surfaces as 502,
//!   not as a client-side timeout status

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, Uri},
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{Environment, ForwarderConfig};
use crate::http::cookie::CookiePolicy;
use crate::http::request::{request_id, RequestIdLayer, X_REQUEST_ID};
use crate::http::response::{bad_gateway_response, missing_upstream_response, relay_response};
use crate::observability::metrics;

/// Reasons a forward attempt fails before a valid upstream reply arrives.
///
/// Every variant collapses to the same 502 shape for the caller; the variant
/// detail feeds logs and the non-production debug body.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The computed target was not a parseable URI.
    #[error("invalid target URL: {0}")]
    Target(String),

    /// Reading the inbound body failed or exceeded the size limit.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// Connection-level failure (refused, DNS, reset).
    #[error("upstream request failed: {0}")]
    Connect(String),

    /// The upstream call exceeded its budget.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    /// Upstream base origin with any trailing slash trimmed; `None` when
    /// `SERVER_URL` is not configured.
    pub upstream_base: Option<String>,
    pub cookie_policy: CookiePolicy,
    pub environment: Environment,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

/// HTTP server for the session forwarder.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ForwarderConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            client,
            upstream_base: config
                .upstream
                .base_url
                .as_deref()
                .map(|base| base.trim_end_matches('/').to_string()),
            cookie_policy: CookiePolicy::for_environment(config.environment),
            environment: config.environment,
            request_timeout: Duration::from_secs(config.upstream.request_timeout_secs),
            max_body_bytes: config.upstream.max_body_bytes,
        };

        let router = Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Map an inbound path + query onto the upstream base origin.
///
/// Pure pass-through: no prefix is stripped or re-added.
fn build_target_url(base: &str, path_and_query: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path_and_query)
}

/// Main forwarding handler.
///
/// Resolves the single upstream target, replays the request, and relays the
/// reply. All failure modes collapse to either the 500 config shape or the
/// 502 gateway shape; nothing escapes untranslated.
async fn forward_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let method_str = method.to_string();

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let Some(base) = state.upstream_base.clone() else {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path_and_query,
            "SERVER_URL is not configured; refusing to forward"
        );
        metrics::record_request(&method_str, 500, start_time);
        return missing_upstream_response();
    };

    let target = build_target_url(&base, &path_and_query);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        target = %target,
        "Forwarding request"
    );

    match forward(&state, request, &method, &target, &request_id).await {
        Ok(response) => {
            let status = response.status();
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path_and_query,
                status = %status,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request forwarded"
            );
            metrics::record_request(&method_str, status.as_u16(), start_time);
            response
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                target = %target,
                error = %error,
                "Upstream unreachable"
            );
            metrics::record_request(&method_str, 502, start_time);
            bad_gateway_response(&error, &target, state.environment)
        }
    }
}

/// Replay one request against the upstream and relay the reply.
async fn forward(
    state: &AppState,
    request: Request<Body>,
    method: &Method,
    target: &str,
    request_id: &str,
) -> Result<Response, ForwardError> {
    let uri: Uri = target
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| ForwardError::Target(e.to_string()))?;

    let (parts, body) = request.into_parts();
    let has_body = *method != Method::GET && *method != Method::HEAD;

    let outbound_body = if has_body {
        let bytes = axum::body::to_bytes(body, state.max_body_bytes)
            .await
            .map_err(|e| ForwardError::Body(e.to_string()))?;
        Body::from(bytes)
    } else {
        Body::empty()
    };

    let mut outbound = Request::new(outbound_body);
    *outbound.method_mut() = method.clone();
    *outbound.uri_mut() = uri;

    // Allow-list header forwarding: the session cookie crosses, plus the
    // correlation ID; everything else the host runtime attached stays here.
    let headers = outbound.headers_mut();
    if let Some(cookie) = parts.headers.get(header::COOKIE) {
        headers.insert(header::COOKIE, cookie.clone());
    }
    if has_body {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    if let Ok(id) = HeaderValue::from_str(request_id) {
        headers.insert(X_REQUEST_ID, id);
    }

    let upstream = tokio::time::timeout(state.request_timeout, state.client.request(outbound))
        .await
        .map_err(|_| ForwardError::Timeout(state.request_timeout))?
        .map_err(|e| ForwardError::Connect(e.to_string()))?;

    Ok(relay_response(upstream, state.cookie_policy))
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    } else {
        tracing::info!("Shutdown signal received");
    }
}
