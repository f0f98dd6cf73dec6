use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, try_join_all};
use holonet_api::{ResourceFetcher, fetch};
use holonet_types::{CompositionStyle, Film, Person, PersonInfo, Planet};
use tracing::debug;

use super::CompositionDriver;
use crate::{AggregationError, ResolutionPlan, assemble};

/// Expresses the dependency graph as straight-line `async` code.
///
/// Film fetches are issued together and awaited once; awaiting them one by
/// one inside a loop would serialize the fan-out.
pub struct LinearDriver {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl LinearDriver {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    async fn resolve_person(&self, person: Person) -> Result<PersonInfo, AggregationError> {
        let plan = ResolutionPlan::from_person(&person);
        debug!(style = %self.style(), homeworld = %plan.homeworld, fan_out = plan.fan_out(), "resolving references");

        let fetcher = &*self.fetcher;
        let films = try_join_all(plan.films.into_iter().map(|reference| fetch::<Film, _>(fetcher, reference)));
        let (planet, films) = tokio::try_join!(fetch::<Planet, _>(fetcher, plan.homeworld), films)?;

        Ok(assemble(&person, planet, films))
    }

    async fn run_reference(&self, reference: String) -> Result<PersonInfo, AggregationError> {
        let person = fetch::<Person, _>(&*self.fetcher, reference).await?;
        self.resolve_person(person).await
    }
}

impl CompositionDriver for LinearDriver {
    fn style(&self) -> CompositionStyle {
        CompositionStyle::Linear
    }

    fn resolve<'a>(&'a self, person: Person) -> BoxFuture<'a, Result<PersonInfo, AggregationError>> {
        self.resolve_person(person).boxed()
    }

    fn run<'a>(&'a self, reference: &str) -> BoxFuture<'a, Result<PersonInfo, AggregationError>> {
        self.run_reference(reference.to_string()).boxed()
    }
}
