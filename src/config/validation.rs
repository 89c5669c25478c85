//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Validation is a pure function and returns all errors, not just the first.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Config field the error refers to.
    pub field: String,

    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a valid socket address: {}", config.listener.bind_address),
        ));
    }

    check_origin(&mut errors, "upstream.primary", config.upstream.primary.as_deref());
    check_origin(&mut errors, "upstream.secondary", config.upstream.secondary.as_deref());

    if config.timeouts.forward_secs == 0 {
        errors.push(ValidationError::new("timeouts.forward_secs", "must be greater than zero"));
    }
    if config.timeouts.upload_secs == 0 {
        errors.push(ValidationError::new("timeouts.upload_secs", "must be greater than zero"));
    }

    if config.health.interval_secs == 0 {
        errors.push(ValidationError::new("health.interval_secs", "must be greater than zero"));
    }
    if config.health.probe_timeout_secs == 0 {
        errors.push(ValidationError::new("health.probe_timeout_secs", "must be greater than zero"));
    }
    if !config.health.path.starts_with('/') {
        errors.push(ValidationError::new(
            "health.path",
            format!("must start with '/': {}", config.health.path),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(errors: &mut Vec<ValidationError>, field: &str, origin: Option<&str>) {
    let Some(origin) = origin else { return };
    match Url::parse(origin) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => {
            errors.push(ValidationError::new(
                field,
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ));
        }
        Err(e) => {
            errors.push(ValidationError::new(field, format!("not a valid URL: {e}")));
        }
    }
}
