use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use holonet_api::{FetchFailure, HolonetClient, HolonetConfig, ResourceFetcher};
use holonet_engine::{PRIMARY_REFERENCE, driver_for};
use holonet_types::{CompositionStyle, PersonInfo};
use tracing::{debug, info};

/// Resolve a person and its homeworld and films into one JSON record.
#[derive(Debug, Parser)]
#[command(name = "holonet", version)]
struct Cli {
    /// Upstream API base URL [default: $HOLONET_API_BASE or https://swapi.dev/api]
    #[arg(long)]
    base_url: Option<String>,

    /// Composition style used to resolve the record
    #[arg(long, value_enum, default_value_t = StyleArg::Linear)]
    style: StyleArg,

    /// Primary reference: an absolute URL or a path relative to the base URL
    #[arg(default_value = PRIMARY_REFERENCE)]
    reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Chained,
    Linear,
    Stream,
    /// Run every style and require identical output
    All,
}

impl StyleArg {
    fn styles(self) -> Vec<CompositionStyle> {
        match self {
            Self::Chained => vec![CompositionStyle::Chained],
            Self::Linear => vec![CompositionStyle::Linear],
            Self::Stream => vec![CompositionStyle::Stream],
            Self::All => CompositionStyle::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let client = match cli.base_url {
        Some(base_url) => HolonetConfig::new(base_url).and_then(|config| HolonetClient::new(&config)),
        None => HolonetClient::from_env(),
    }
    .context("could not configure the HTTP client")?;
    debug!(base_url = %client.base_url(), "client ready");

    let fetcher: Arc<dyn ResourceFetcher> = Arc::new(client);
    let info = resolve_with_styles(fetcher, &cli.reference, &cli.style.styles()).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run each style in turn and fail unless all serialized outputs match.
async fn resolve_with_styles(fetcher: Arc<dyn ResourceFetcher>, reference: &str, styles: &[CompositionStyle]) -> Result<PersonInfo> {
    let mut first: Option<(CompositionStyle, Vec<u8>, PersonInfo)> = None;

    for &style in styles {
        let info = resolve_with_style(style, Arc::clone(&fetcher), reference).await?;
        let bytes = serde_json::to_vec(&info)?;
        if let Some((first_style, first_bytes, _)) = &first {
            if *first_bytes != bytes {
                bail!("{style} output differs from {first_style} output for '{reference}'");
            }
            continue;
        }
        first = Some((style, bytes, info));
    }

    first
        .map(|(_, _, info)| info)
        .context("no composition style selected")
}

async fn resolve_with_style(style: CompositionStyle, fetcher: Arc<dyn ResourceFetcher>, reference: &str) -> Result<PersonInfo> {
    info!(%style, %reference, "resolving");
    let driver = driver_for(style, fetcher);
    driver.run(reference).await.map_err(|error| {
        let message = match error.fetch_failure().and_then(FetchFailure::hint) {
            Some(hint) => format!("{style} resolution of '{reference}' failed. {hint}"),
            None => format!("{style} resolution of '{reference}' failed"),
        };
        anyhow::Error::new(error).context(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_linear_style_and_primary_reference() {
        let cli = Cli::try_parse_from(["holonet"]).expect("defaults parse");

        assert_eq!(cli.style, StyleArg::Linear);
        assert_eq!(cli.reference, PRIMARY_REFERENCE);
        assert_eq!(cli.base_url, None);
    }

    #[test]
    fn base_url_flag_is_optional_and_explicit() {
        let cli = Cli::try_parse_from(["holonet", "--base-url", "http://localhost:8080/api"]).expect("parse");

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080/api"));
    }

    #[test]
    fn all_expands_to_every_style() {
        let cli = Cli::try_parse_from(["holonet", "--style", "all", "/people/4"]).expect("parse");

        assert_eq!(cli.style.styles(), CompositionStyle::ALL.to_vec());
        assert_eq!(cli.reference, "/people/4");
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert!(Cli::try_parse_from(["holonet", "--style", "reactive"]).is_err());
    }
}
