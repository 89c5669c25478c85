//! Resilient request layer over the same-origin gateway.
//!
//! # Responsibilities
//! - Attach the bearer credential, workspace id, and backend override
//! - Apply a per-call deadline independent of the gateway's
//! - Parse the gateway envelope and normalize every failure into `ApiError`
//!
//! All calls go through the `/gateway` prefix on the same origin; the
//! browser-side never contacts a backend origin directly.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{multipart::Form, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::client::error::ApiError;
use crate::client::overrides::OverrideStore;
use crate::client::session::SessionProvider;
use crate::gateway::{OVERRIDE_HEADER, WORKSPACE_HEADER};

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default deadline for multipart uploads.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Parameters of one API call.
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub path: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub workspace_id: Option<String>,
    pub timeout: Duration,
}

impl ApiCall {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        let mut call = Self::new(Method::POST, path);
        call.body = Some(body);
        call
    }

    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            body: None,
            workspace_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Add a query parameter. Empty values are dropped at send time.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the same-origin gateway.
pub struct ApiClient {
    http: reqwest::Client,
    gateway_base: String,
    session: Arc<dyn SessionProvider>,
    overrides: OverrideStore,
}

impl ApiClient {
    /// Create a client targeting `gateway_base` (origin plus `/gateway`).
    pub fn new(
        gateway_base: impl Into<String>,
        session: Arc<dyn SessionProvider>,
        overrides: OverrideStore,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ApiError::connection)?;
        Ok(Self {
            http,
            gateway_base: gateway_base.into().trim_end_matches('/').to_string(),
            session,
            overrides,
        })
    }

    /// Handle to the override store this client reads on every call.
    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    /// Issue one API call and deserialize the JSON response.
    ///
    /// Fails before any network I/O when no session token is available.
    pub async fn request<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, ApiError> {
        let headers = self.auth_headers(call.workspace_id.as_deref())?;
        let url = format!("{}{}", self.gateway_base, call.path);

        let query: Vec<&(String, String)> =
            call.query.iter().filter(|(_, v)| !v.is_empty()).collect();

        let mut builder = self
            .http
            .request(call.method.clone(), url)
            .headers(headers)
            .query(&query)
            .timeout(call.timeout);

        if call.method != Method::GET {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .json(&call.body.clone().unwrap_or_else(|| json!({})));
        }

        self.settle(builder).await
    }

    /// Issue a multipart upload.
    ///
    /// No content type is set; the transport computes the boundary.
    pub async fn request_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        workspace_id: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let headers = self.auth_headers(workspace_id)?;
        let url = format!("{}{}", self.gateway_base, path);

        let builder = self
            .http
            .post(url)
            .headers(headers)
            .multipart(form)
            .timeout(timeout.unwrap_or(DEFAULT_UPLOAD_TIMEOUT));

        self.settle(builder).await
    }

    /// Credential precondition plus the forwarded header subset.
    fn auth_headers(&self, workspace_id: Option<&str>) -> Result<HeaderMap, ApiError> {
        let token = self
            .session
            .access_token()
            .ok_or_else(ApiError::session_expired)?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::session_expired())?;
        headers.insert(AUTHORIZATION, bearer);

        if let Some(origin) = self.overrides.get() {
            if let Ok(value) = HeaderValue::from_str(&origin) {
                headers.insert(OVERRIDE_HEADER, value);
            }
        }
        if let Some(workspace) = workspace_id {
            if let Ok(value) = HeaderValue::from_str(workspace) {
                headers.insert(WORKSPACE_HEADER, value);
            }
        }
        Ok(headers)
    }

    /// Send, classify transport failures, and map non-2xx into `ApiError`.
    async fn settle<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout()
            } else {
                ApiError::connection(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout()
            } else {
                ApiError::connection(e)
            }
        })?;
        let parsed = parse_lenient(&text);

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), parsed));
        }

        serde_json::from_value(parsed).map_err(ApiError::invalid_response)
    }
}

/// Parse a response body, tolerating non-JSON payloads.
fn parse_lenient(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_wraps_non_json() {
        assert_eq!(parse_lenient("plain text"), json!({"raw": "plain text"}));
        assert_eq!(parse_lenient(""), json!({}));
        assert_eq!(parse_lenient("{\"a\":1}"), json!({"a": 1}));
    }

    #[test]
    fn call_builder_defaults() {
        let call = ApiCall::get("/items").query("page", 2).query("q", "");
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.timeout, DEFAULT_TIMEOUT);
        assert!(call.body.is_none());
        assert_eq!(call.query.len(), 2);
    }
}
