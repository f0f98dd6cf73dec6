//! Base-URL configuration for the Holonet client.

use std::env;

use url::Url;

use crate::ConfigError;

/// Environment variable that overrides the upstream API base URL.
pub const BASE_URL_ENV_VAR: &str = "HOLONET_API_BASE";
/// Public API used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api";
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolonetConfig {
    base_url: String,
}

impl HolonetConfig {
    /// Validate and wrap a base URL. A trailing slash is dropped so that
    /// API-relative references can be appended verbatim.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Read the base URL from `HOLONET_API_BASE`, falling back to the public API.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HolonetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), ConfigError> {
    let parsed_base_url = Url::parse(base).map_err(|error| ConfigError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: error.to_string(),
    })?;

    let host_name = parsed_base_url.host_str().ok_or_else(|| ConfigError::MissingHost {
        base_url: base.to_string(),
    })?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(ConfigError::InsecureScheme {
            scheme: parsed_base_url.scheme().to_string(),
        });
    }

    Ok(())
}
