//! Configuration loading from disk and the environment.
//!
//! A config file is optional: the defaults describe a working local
//! deployment. Environment variables take precedence over the file so the
//! backend origin can be swapped without editing anything.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the primary backend origin.
pub const ENV_PRIMARY: &str = "API_URL";

/// Environment variable holding the secondary backend origin.
pub const ENV_SECONDARY: &str = "API_URL_FALLBACK";

/// Environment variable overriding the listener bind address.
pub const ENV_BIND: &str = "GATEWAY_BIND";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Reads the TOML file when a path is given, otherwise starts from defaults,
/// then applies environment overrides and validates the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config: GatewayConfig = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut GatewayConfig) {
    if let Some(primary) = env_non_empty(ENV_PRIMARY) {
        config.upstream.primary = Some(primary);
    }
    if let Some(secondary) = env_non_empty(ENV_SECONDARY) {
        config.upstream.secondary = Some(secondary);
    }
    if let Some(bind) = env_non_empty(ENV_BIND) {
        config.listener.bind_address = bind;
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
