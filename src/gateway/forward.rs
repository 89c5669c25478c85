//! Forwarding engine.
//!
//! # Responsibilities
//! - Build the outbound URL from the effective target and request path
//! - Issue the upstream call under a hard deadline, body included
//! - Relay any received response unchanged (status included)
//! - Synthesize the structured 503 envelope on transport failure
//!
//! # Design Decisions
//! - Upstream 4xx/5xx are pass-through: business errors belong to the
//!   caller, the gateway only reports its own inability to reach a backend
//! - Transport failures are terminal per call; retry is a user action in
//!   the client, never automatic here
//! - The deadline is a race between the call and a timer; the losing future
//!   is dropped, which releases its connection

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use serde::Serialize;
use std::time::Duration;
use tokio::time;

use crate::gateway::headers::filter_response_headers;

/// HTTP client used for upstream calls.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// One inbound request, reduced to exactly what forwarding needs.
///
/// Immutable once constructed; headers are already filtered.
pub struct ForwardRequest {
    pub method: Method,
    /// Upstream path with the gateway prefix stripped, no leading slash.
    pub path: String,
    /// Raw query string including the leading `?`, or empty.
    pub query: String,
    pub headers: HeaderMap,
    /// Buffered request body; ignored for bodyless methods.
    pub body: Bytes,
}

/// Classification of a gateway-synthesized failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    /// No valid candidate origin; no network I/O was attempted.
    Config,
    /// Transport actively refused the connection.
    Refused,
    /// The deadline expired before the upstream answered.
    Timeout,
    /// Any other transport-level failure.
    Other,
}

/// JSON body of the 503 failure envelope.
#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'static str,
    message: String,
    target: &'a str,
    path: String,
    method: String,
    candidates: &'a [String],
    reason: String,
    hint: &'static str,
}

const ENVELOPE_ERROR: &str = "backend_unavailable";
const ENVELOPE_HINT: &str =
    "Set API_URL (or API_URL_FALLBACK) to the backend origin, e.g. http://127.0.0.1:8000";

/// Methods forwarded without a body.
fn is_bodyless(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::DELETE)
}

/// Forward one request to the effective target.
///
/// Always returns a well-formed response: either the upstream response with
/// filtered headers, or the 503 envelope. Never panics past this boundary.
pub async fn forward(
    request: ForwardRequest,
    candidates: &[String],
    client: &UpstreamClient,
    deadline: Duration,
) -> Response {
    let Some(target) = candidates.first() else {
        tracing::warn!(path = %request.path, "No candidate backend origin configured");
        return failure_response(
            FailureKind::Config,
            "",
            &request,
            candidates,
            "no candidate origins".to_string(),
            deadline,
        );
    };

    let uri_string = format!("{}/{}{}", target, request.path, request.query);
    let uri: Uri = match uri_string.parse() {
        Ok(uri) => uri,
        Err(e) => {
            return failure_response(
                FailureKind::Other,
                target,
                &request,
                candidates,
                format!("invalid upstream URL {uri_string}: {e}"),
                deadline,
            );
        }
    };

    let mut builder = Request::builder().method(request.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        *headers = request.headers.clone();
    }
    let body = if is_bodyless(&request.method) {
        Body::empty()
    } else {
        Body::from(request.body.clone())
    };
    let outbound = match builder.body(body) {
        Ok(outbound) => outbound,
        Err(e) => {
            return failure_response(
                FailureKind::Other,
                target,
                &request,
                candidates,
                format!("failed to build upstream request: {e}"),
                deadline,
            );
        }
    };

    let started = std::time::Instant::now();
    match time::timeout(deadline, client.request(outbound)).await {
        Ok(Ok(upstream)) => {
            let status = upstream.status();
            tracing::debug!(backend = %target, status = %status, path = %request.path, "Upstream responded");
            let (parts, body) = upstream.into_parts();
            // The remaining deadline also bounds the body; a backend can
            // stall after the status line.
            let remaining = deadline.saturating_sub(started.elapsed());
            match time::timeout(remaining, to_bytes(Body::new(body), usize::MAX)).await {
                Ok(Ok(bytes)) => {
                    let mut response = Response::new(Body::from(bytes));
                    *response.status_mut() = status;
                    *response.headers_mut() = filter_response_headers(&parts.headers);
                    response
                }
                Ok(Err(e)) => failure_response(
                    FailureKind::Other,
                    target,
                    &request,
                    candidates,
                    error_chain(&e),
                    deadline,
                ),
                Err(_) => failure_response(
                    FailureKind::Timeout,
                    target,
                    &request,
                    candidates,
                    format!("deadline of {}ms elapsed mid-response", deadline.as_millis()),
                    deadline,
                ),
            }
        }
        Ok(Err(e)) => {
            let kind = if is_connection_refused(&e) {
                FailureKind::Refused
            } else {
                FailureKind::Other
            };
            failure_response(kind, target, &request, candidates, error_chain(&e), deadline)
        }
        Err(_) => failure_response(
            FailureKind::Timeout,
            target,
            &request,
            candidates,
            format!("deadline of {}ms elapsed", deadline.as_millis()),
            deadline,
        ),
    }
}

fn failure_response(
    kind: FailureKind,
    target: &str,
    request: &ForwardRequest,
    candidates: &[String],
    reason: String,
    deadline: Duration,
) -> Response {
    let message = match kind {
        FailureKind::Config => "No valid backend origin configured".to_string(),
        FailureKind::Refused => format!("Connection refused to backend {target}"),
        FailureKind::Timeout => {
            format!("Timeout ({}ms) contacting backend {target}", deadline.as_millis())
        }
        FailureKind::Other => format!("Failed to contact backend {target}: {reason}"),
    };

    let path = format!("/{}", request.path);
    tracing::error!(
        backend = %target,
        path = %path,
        method = %request.method,
        reason = %reason,
        ?candidates,
        "Forward failed"
    );

    let envelope = ErrorEnvelope {
        error: ENVELOPE_ERROR,
        message,
        target,
        path,
        method: request.method.to_string(),
        candidates,
        reason,
        hint: ENVELOPE_HINT,
    };

    let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(&envelope)).into_response();
    response.headers_mut().insert(
        CONTENT_TYPE,
        axum::http::HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}

/// Walk the error source chain looking for a refused TCP connection.
fn is_connection_refused(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = current.source();
    }
    false
}

/// Render an error with its full source chain for the `reason` field.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(current) = source {
        rendered.push_str(": ");
        rendered.push_str(&current.to_string());
        source = current.source();
    }
    rendered
}
