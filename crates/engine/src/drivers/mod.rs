//! Composition drivers.
//!
//! Each driver wires fetch → resolve → assemble in a different asynchronous
//! style. They share the domain logic in [`crate::resolve`] and
//! [`crate::aggregate`] and must stay observably equivalent: same output, same
//! film ordering, and failure whenever any required fetch fails.
//!
//! Modules:
//! - `chained`: explicit continuations registered on each completion
//! - `linear`: straight-line `async`/`await` with joined waits
//! - `stream`: composed producers with cancellable subscriptions

mod chained;
mod linear;
mod stream;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use holonet_api::ResourceFetcher;
use holonet_types::{CompositionStyle, Person, PersonInfo};

use crate::AggregationError;

pub use chained::ChainedDriver;
pub use linear::LinearDriver;
pub use stream::{StreamDriver, Subscription};

/// Common capability of every composition style.
pub trait CompositionDriver: Send + Sync {
    fn style(&self) -> CompositionStyle;

    /// Resolve the dependent references of an already fetched primary record.
    ///
    /// The homeworld and every film are fetched concurrently; the result is
    /// produced only once all of them succeeded.
    fn resolve<'a>(&'a self, person: Person) -> BoxFuture<'a, Result<PersonInfo, AggregationError>>;

    /// Fetch the primary record at `reference`, then resolve it.
    fn run<'a>(&'a self, reference: &str) -> BoxFuture<'a, Result<PersonInfo, AggregationError>>;
}

/// Build the driver for `style` on top of `fetcher`.
pub fn driver_for(style: CompositionStyle, fetcher: Arc<dyn ResourceFetcher>) -> Box<dyn CompositionDriver> {
    match style {
        CompositionStyle::Chained => Box::new(ChainedDriver::new(fetcher)),
        CompositionStyle::Linear => Box::new(LinearDriver::new(fetcher)),
        CompositionStyle::Stream => Box::new(StreamDriver::new(fetcher)),
    }
}
