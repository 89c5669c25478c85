//! Header filtering across the trust boundary.
//!
//! # Responsibilities
//! - Copy only the explicit allow-list of request headers upstream
//! - Copy only the explicit allow-list of response headers back
//!
//! Cookies, host, and backend-internal headers must never cross in either
//! direction; an allow-list is the only safe default here.

use axum::http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};

/// Tenant-scoping header, forwarded verbatim and otherwise opaque.
pub const WORKSPACE_HEADER: &str = "x-workspace-id";

/// Per-request backend origin override. Consumed by the gateway, never
/// forwarded upstream.
pub const OVERRIDE_HEADER: &str = "x-backend-override";

/// Content type assumed when the backend does not declare one.
const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Build the outbound header set from an inbound request.
pub fn filter_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::new();
    if let Some(auth) = inbound.get(AUTHORIZATION) {
        outbound.insert(AUTHORIZATION, auth.clone());
    }
    if let Some(workspace) = inbound.get(WORKSPACE_HEADER) {
        outbound.insert(WORKSPACE_HEADER, workspace.clone());
    }
    if let Some(content_type) = inbound.get(CONTENT_TYPE) {
        outbound.insert(CONTENT_TYPE, content_type.clone());
    }
    outbound
}

/// Build the client-facing header set from an upstream response.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    let content_type = upstream
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    out.insert(CONTENT_TYPE, content_type);
    if let Some(cache_control) = upstream.get(CACHE_CONTROL) {
        out.insert(CACHE_CONTROL, cache_control.clone());
    }
    out
}

/// Whether the inbound request carries a multipart upload.
pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, HOST};

    #[test]
    fn request_filter_keeps_only_allowlist() {
        let mut inbound = HeaderMap::new();
        inbound.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        inbound.insert(WORKSPACE_HEADER, HeaderValue::from_static("ws-1"));
        inbound.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        inbound.insert(COOKIE, HeaderValue::from_static("session=secret"));
        inbound.insert(HOST, HeaderValue::from_static("dashboard.example.com"));
        inbound.insert(OVERRIDE_HEADER, HeaderValue::from_static("http://alt:9"));

        let out = filter_request_headers(&inbound);
        assert_eq!(out.len(), 3);
        assert_eq!(out.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(out.get(WORKSPACE_HEADER).unwrap(), "ws-1");
        assert!(out.get(COOKIE).is_none());
        assert!(out.get(HOST).is_none());
        assert!(out.get(OVERRIDE_HEADER).is_none());
    }

    #[test]
    fn absent_headers_are_not_invented() {
        let out = filter_request_headers(&HeaderMap::new());
        assert!(out.is_empty());
    }

    #[test]
    fn response_filter_defaults_content_type() {
        let out = filter_response_headers(&HeaderMap::new());
        assert_eq!(out.get(CONTENT_TYPE).unwrap(), DEFAULT_CONTENT_TYPE);
        assert!(out.get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn response_filter_drops_backend_internals() {
        let mut upstream = HeaderMap::new();
        upstream.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        upstream.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        upstream.insert("x-internal-node", HeaderValue::from_static("db-7"));
        upstream.insert("set-cookie", HeaderValue::from_static("leak=1"));

        let out = filter_response_headers(&upstream);
        assert_eq!(out.len(), 2);
        assert_eq!(out.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(out.get(CACHE_CONTROL).unwrap(), "no-store");
    }

    #[test]
    fn multipart_detection() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=xyz"),
        );
        assert!(is_multipart(&headers));
        assert!(!is_multipart(&HeaderMap::new()));
    }
}
