//! Holonet resource fetching.
//!
//! This crate performs single-attempt HTTP GETs against a resource-oriented
//! JSON API and parses the bodies into caller-declared shapes. It focuses on:
//!
//! - A transport seam, [`ResourceFetcher`], so orchestration code can run
//!   against the real API or an in-memory stand-in
//! - A `reqwest`-backed implementation, [`HolonetClient`]
//! - Strict deserialization at the boundary via [`fetch`], which fails with
//!   [`FetchFailure::Parse`] instead of letting missing fields flow onward
//!
//! There are no retries and no timeouts; a single attempt is final.
//!
//! # Example
//!
//! ```ignore
//! use holonet_api::{HolonetClient, HolonetConfig, fetch};
//! use holonet_types::Planet;
//!
//! let client = HolonetClient::new(&HolonetConfig::from_env()?)?;
//! let planet: Planet = fetch(&client, "/planets/1").await?;
//! println!("{}", planet.name);
//! ```

mod config;
mod error;
mod parser;

use std::env;
use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub use config::{BASE_URL_ENV_VAR, DEFAULT_BASE_URL, HolonetConfig};
pub use error::{ConfigError, FetchFailure};
pub use parser::parse_resource;

/// Transport seam: one GET per call, returning the raw body of a successful
/// response.
///
/// Implementations must fail with [`FetchFailure::Transport`] when the request
/// cannot be completed and [`FetchFailure::Status`] for non-success statuses.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn get_text(&self, reference: &str) -> Result<String, FetchFailure>;
}

/// Fetch `reference` and strictly deserialize the body into `T`.
///
/// The reference is owned by the returned future, so it only borrows the
/// fetcher and can be moved into continuations freely.
pub fn fetch<'a, T, F>(fetcher: &'a F, reference: impl Into<String>) -> impl Future<Output = Result<T, FetchFailure>> + Send + 'a
where
    T: DeserializeOwned + Send + 'a,
    F: ResourceFetcher + ?Sized,
{
    let reference = reference.into();
    async move {
        let body = fetcher.get_text(&reference).await?;
        parse_resource(&reference, &body)
    }
}

/// Thin wrapper around a configured `reqwest::Client`.
///
/// No timeout is configured: a stalled upstream stalls the caller. The client
/// holds no cache, so reusing it across runs has no semantic effect.
#[derive(Debug, Clone)]
pub struct HolonetClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl HolonetClient {
    pub fn new(config: &HolonetConfig) -> Result<Self, ConfigError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            http,
            user_agent: format!("holonet/0.1; {}", env::consts::OS),
        })
    }

    /// Construct a client from `HOLONET_API_BASE` or the public default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&HolonetConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute references pass through; anything else is treated as a path
    /// relative to the configured base URL.
    pub fn resolve_reference(&self, reference: &str) -> String {
        if Url::parse(reference).is_ok() {
            return reference.to_string();
        }
        if reference.starts_with('/') {
            format!("{}{}", self.base_url, reference)
        } else {
            format!("{}/{}", self.base_url, reference)
        }
    }
}

#[async_trait]
impl ResourceFetcher for HolonetClient {
    async fn get_text(&self, reference: &str) -> Result<String, FetchFailure> {
        let start = Instant::now();
        let url = self.resolve_reference(reference);
        debug!(%reference, %url, "fetch started");

        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|error| {
                warn!(
                    %reference,
                    error = %error,
                    duration_ms = start.elapsed().as_millis(),
                    "fetch failed before a response arrived"
                );
                FetchFailure::transport(reference, error.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                %reference,
                status = %status,
                duration_ms = start.elapsed().as_millis(),
                "fetch returned a non-success status"
            );
            return Err(FetchFailure::status(reference, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|error| FetchFailure::transport(reference, error.to_string()))?;

        debug!(
            %reference,
            status = %status,
            body_len = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "fetch completed"
        );
        Ok(body)
    }
}
