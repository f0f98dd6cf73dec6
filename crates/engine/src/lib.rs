//! # Holonet Engine
//!
//! Resolves the dependent references of a primary record and assembles one
//! denormalized [`PersonInfo`]. A person carries a reference to its homeworld
//! and an ordered list of film references; the engine fetches the person,
//! fans out to the homeworld and every film concurrently, waits for all of
//! them, and merges the results.
//!
//! ## Composition styles
//!
//! The same resolution is available in three interchangeable styles, all
//! implementing [`CompositionDriver`]:
//!
//! - **[`ChainedDriver`]**: explicit continuations (`and_then`, `map_ok`)
//! - **[`LinearDriver`]**: straight-line `async`/`await` with joined waits
//! - **[`StreamDriver`]**: composed producers, with cancellable
//!   [`Subscription`]s
//!
//! All styles produce the same record for the same upstream responses, keep
//! films in reference order, and fail as a whole when any fetch fails.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use holonet_api::HolonetClient;
//!
//! let fetcher = Arc::new(HolonetClient::from_env()?);
//! let info = holonet_engine::person_info_linear(fetcher).await?;
//! println!("{} is from {}", info.name, info.homeworld);
//! ```

use std::sync::Arc;

use holonet_api::ResourceFetcher;
use holonet_types::PersonInfo;

mod aggregate;
pub mod drivers;
mod error;
pub mod resolve;
#[cfg(test)]
mod test_support;

pub use aggregate::assemble;
pub use drivers::{ChainedDriver, CompositionDriver, LinearDriver, StreamDriver, Subscription, driver_for};
pub use error::AggregationError;
pub use resolve::ResolutionPlan;

/// Primary reference resolved by the `person_info_*` entry points.
pub const PRIMARY_REFERENCE: &str = "/people/1";

/// Resolve [`PRIMARY_REFERENCE`] with explicit continuations.
pub async fn person_info_chained(fetcher: Arc<dyn ResourceFetcher>) -> Result<PersonInfo, AggregationError> {
    ChainedDriver::new(fetcher).run(PRIMARY_REFERENCE).await
}

/// Resolve [`PRIMARY_REFERENCE`] with straight-line `async`/`await`.
pub async fn person_info_linear(fetcher: Arc<dyn ResourceFetcher>) -> Result<PersonInfo, AggregationError> {
    LinearDriver::new(fetcher).run(PRIMARY_REFERENCE).await
}

/// Resolve [`PRIMARY_REFERENCE`] through composed producers.
pub async fn person_info_stream(fetcher: Arc<dyn ResourceFetcher>) -> Result<PersonInfo, AggregationError> {
    StreamDriver::new(fetcher).run(PRIMARY_REFERENCE).await
}
