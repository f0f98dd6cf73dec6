use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt, TryFutureExt};
use holonet_api::{ResourceFetcher, fetch};
use holonet_types::{CompositionStyle, Film, Person, PersonInfo, Planet};
use tracing::debug;

use super::CompositionDriver;
use crate::{AggregationError, ResolutionPlan, assemble};

/// Expresses every step as a continuation registered on the completion of
/// the step before it.
///
/// The film continuations are collected into one list and the driver waits
/// on the conjunction of that list and the homeworld continuation.
pub struct ChainedDriver {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl ChainedDriver {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }
}

impl CompositionDriver for ChainedDriver {
    fn style(&self) -> CompositionStyle {
        CompositionStyle::Chained
    }

    fn resolve<'a>(&'a self, person: Person) -> BoxFuture<'a, Result<PersonInfo, AggregationError>> {
        let plan = ResolutionPlan::from_person(&person);
        debug!(style = %self.style(), homeworld = %plan.homeworld, fan_out = plan.fan_out(), "resolving references");

        let homeworld = fetch::<Planet, _>(&*self.fetcher, plan.homeworld);
        let films = future::try_join_all(plan.films.into_iter().map(move |reference| fetch::<Film, _>(&*self.fetcher, reference)));

        future::try_join(homeworld, films)
            .map_ok(move |(planet, films)| assemble(&person, planet, films))
            .err_into::<AggregationError>()
            .boxed()
    }

    fn run<'a>(&'a self, reference: &str) -> BoxFuture<'a, Result<PersonInfo, AggregationError>> {
        fetch::<Person, _>(&*self.fetcher, reference.to_string())
            .err_into::<AggregationError>()
            .and_then(move |person| self.resolve(person))
            .boxed()
    }
}
