//! Error types for resource fetching and client configuration.

use thiserror::Error;

/// Failure of a single fetch, always naming the reference that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("transport failure fetching '{reference}': {message}")]
    Transport { reference: String, message: String },

    #[error("'{reference}' responded with HTTP {status}")]
    Status { reference: String, status: u16 },

    #[error("failed to parse '{reference}': {message}. body preview: {body_preview}")]
    Parse {
        reference: String,
        message: String,
        body_preview: String,
    },
}

impl FetchFailure {
    /// Create a transport failure.
    pub fn transport(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a status failure.
    pub fn status(reference: impl Into<String>, status: u16) -> Self {
        Self::Status {
            reference: reference.into(),
            status,
        }
    }

    /// Create a parse failure.
    pub fn parse(reference: impl Into<String>, message: impl Into<String>, body_preview: impl Into<String>) -> Self {
        Self::Parse {
            reference: reference.into(),
            message: message.into(),
            body_preview: body_preview.into(),
        }
    }

    /// The reference whose fetch failed.
    pub fn reference(&self) -> &str {
        match self {
            Self::Transport { reference, .. } | Self::Status { reference, .. } | Self::Parse { reference, .. } => reference,
        }
    }

    /// A user-facing hint for common failures, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Transport { .. } => Some("Hint: check the network connection and HOLONET_API_BASE"),
            Self::Status { status: 404, .. } => Some("Hint: the reference does not exist upstream"),
            Self::Status { status: 429, .. } => Some("Hint: the upstream API is rate limiting requests"),
            Self::Status { .. } | Self::Parse { .. } => None,
        }
    }
}

/// Errors raised while building a client from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("base URL '{base_url}' must include a host")]
    MissingHost { base_url: String },

    #[error("base URL must use https for non-localhost hosts; got '{scheme}://'")]
    InsecureScheme { scheme: String },

    #[error("could not build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_exposes_its_reference() {
        let failures = [
            FetchFailure::transport("/people/1", "connection refused"),
            FetchFailure::status("/people/1", 500),
            FetchFailure::parse("/people/1", "expected value", "<empty>"),
        ];

        for failure in failures {
            assert_eq!(failure.reference(), "/people/1");
            assert!(failure.to_string().contains("/people/1"));
        }
    }

    #[test]
    fn hint_covers_not_found_but_not_server_errors() {
        assert!(FetchFailure::status("/films/99", 404).hint().is_some());
        assert!(FetchFailure::status("/films/1", 500).hint().is_none());
    }
}
