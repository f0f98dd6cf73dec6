use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::{self, BoxFuture, FutureExt, TryFutureExt};
use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use holonet_api::{ResourceFetcher, fetch};
use holonet_types::{CompositionStyle, Film, Person, PersonInfo, Planet};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::debug;

use super::CompositionDriver;
use crate::{AggregationError, ResolutionPlan, assemble};

type Resolution<'a> = BoxStream<'a, Result<PersonInfo, AggregationError>>;

/// Expresses the dependency graph as composed producers.
///
/// The primary producer is mapped into a join of a single-resource producer
/// (the homeworld) and a concurrent join of film producers, which is then
/// mapped into the output record. Films complete in any order and are put
/// back in reference order; the first failure on either side ends the join.
/// Each producer emits at most once.
pub struct StreamDriver {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl StreamDriver {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Producer of the record for `reference`. Nothing is fetched until the
    /// stream is polled; dropping it drops every pending fetch.
    pub fn observe(&self, reference: &str) -> Resolution<'_> {
        stream::once(fetch::<Person, _>(&*self.fetcher, reference.to_string()))
            .err_into::<AggregationError>()
            .map_ok(move |person| self.resolution(person))
            .try_flatten()
            .boxed()
    }

    /// Subscribe to the record for `reference` with a fresh cancellation token.
    pub fn subscribe(&self, reference: &str) -> Subscription<'_> {
        self.subscribe_with_token(reference, CancellationToken::new())
    }

    /// Subscribe to the record for `reference`, ending early once `token`
    /// is cancelled. Pass a child token to tie the subscription to a parent.
    pub fn subscribe_with_token(&self, reference: &str, token: CancellationToken) -> Subscription<'_> {
        Subscription {
            inner: Some(self.observe(reference)),
            cancelled: Box::pin(token.clone().cancelled_owned()),
            token,
        }
    }

    fn resolution(&self, person: Person) -> Resolution<'_> {
        let plan = ResolutionPlan::from_person(&person);
        debug!(style = %self.style(), homeworld = %plan.homeworld, fan_out = plan.fan_out(), "resolving references");

        let fetcher = &*self.fetcher;
        let fan_out = plan.films.len().max(1);
        let homeworld = fetch::<Planet, _>(fetcher, plan.homeworld);
        let films = stream::iter(plan.films.into_iter().enumerate())
            .map(move |(index, reference)| fetch::<Film, _>(fetcher, reference).map_ok(move |film| (index, film)))
            .buffer_unordered(fan_out)
            .try_collect::<Vec<(usize, Film)>>()
            .map_ok(|mut films| {
                films.sort_by_key(|(index, _)| *index);
                films.into_iter().map(|(_, film)| film).collect::<Vec<Film>>()
            });

        stream::once(future::try_join(homeworld, films))
            .err_into::<AggregationError>()
            .map_ok(move |(planet, films)| assemble(&person, planet, films))
            .boxed()
    }
}

impl CompositionDriver for StreamDriver {
    fn style(&self) -> CompositionStyle {
        CompositionStyle::Stream
    }

    fn resolve<'a>(&'a self, person: Person) -> BoxFuture<'a, Result<PersonInfo, AggregationError>> {
        let subject = person.name.clone();
        first_emission(self.resolution(person), subject).boxed()
    }

    fn run<'a>(&'a self, reference: &str) -> BoxFuture<'a, Result<PersonInfo, AggregationError>> {
        first_emission(self.observe(reference), reference.to_string()).boxed()
    }
}

async fn first_emission(mut resolution: Resolution<'_>, subject: String) -> Result<PersonInfo, AggregationError> {
    match resolution.next().await {
        Some(result) => result,
        None => Err(AggregationError::cancelled(subject)),
    }
}

/// A cancellable subscription to one resolution.
///
/// Yields at most one item. Once cancelled it ends without an item and drops
/// the underlying producers, and with them every fetch still in flight.
pub struct Subscription<'a> {
    inner: Option<Resolution<'a>>,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    token: CancellationToken,
}

impl Subscription<'_> {
    /// Stop the subscription; pending fetches are dropped on the next poll.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Stream for Subscription<'_> {
    type Item = Result<PersonInfo, AggregationError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.inner.is_none() {
            return Poll::Ready(None);
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.inner = None;
            debug!("subscription cancelled; pending fetches dropped");
            return Poll::Ready(None);
        }

        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                this.inner = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
