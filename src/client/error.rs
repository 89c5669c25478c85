//! Error type for the client request layer.

use serde_json::Value;
use thiserror::Error;

/// The single error shape every client-layer caller consumes.
///
/// Every failure origin (missing credential, transport, timeout, non-2xx)
/// is normalized into this type; nothing else crosses the layer boundary.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message, always present.
    pub message: String,

    /// HTTP status, when a response was received.
    pub status: Option<u16>,

    /// Parsed response body, when one was received.
    pub detail: Option<Value>,
}

impl ApiError {
    /// No bearer credential available; raised before any network I/O.
    pub fn session_expired() -> Self {
        Self {
            message: "Session expired. Please sign in again.".to_string(),
            status: None,
            detail: None,
        }
    }

    /// The client-side deadline expired.
    pub fn timeout() -> Self {
        Self {
            message: "Timed out waiting for the API.".to_string(),
            status: None,
            detail: None,
        }
    }

    /// Transport-level failure other than a timeout.
    pub fn connection(reason: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Failed to reach the API: {reason}"),
            status: None,
            detail: None,
        }
    }

    /// The response body could not be interpreted as the expected type.
    pub fn invalid_response(reason: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Unexpected API response: {reason}"),
            status: None,
            detail: None,
        }
    }

    /// A non-2xx response, message extracted from the parsed body.
    ///
    /// Extraction priority: the body's `message` field, then a string
    /// `detail` field, then a generic message carrying the status.
    pub fn from_status(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("detail").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("API request failed ({status})"));
        Self {
            message,
            status: Some(status),
            detail: Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_field_wins() {
        let err = ApiError::from_status(503, json!({"message": "backend down", "detail": "x"}));
        assert_eq!(err.message, "backend down");
        assert_eq!(err.status, Some(503));
    }

    #[test]
    fn string_detail_is_second_choice() {
        let err = ApiError::from_status(404, json!({"detail": "not found"}));
        assert_eq!(err.message, "not found");
    }

    #[test]
    fn non_string_detail_falls_back_to_generic() {
        let err = ApiError::from_status(422, json!({"detail": {"field": "sku"}}));
        assert_eq!(err.message, "API request failed (422)");
        assert_eq!(err.detail.unwrap()["detail"]["field"], "sku");
    }
}
