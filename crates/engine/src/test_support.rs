//! In-memory fetcher and fixtures for driver tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use holonet_api::{FetchFailure, ResourceFetcher};
use holonet_types::{Film, PersonInfo};
use serde_json::{Value, json};

enum StubReply {
    Body(String),
    Fail(FetchFailure),
    Never,
}

struct StubRoute {
    reply: StubReply,
    /// Extra scheduler yields before answering.
    delay: usize,
}

/// Answers from a fixed route table and records how it was called.
///
/// Every answered fetch yields to the scheduler at least once, so sibling
/// fetches issued together are all in flight before any of them completes.
/// Unknown references answer with HTTP 404.
#[derive(Default)]
pub(crate) struct StubFetcher {
    routes: HashMap<String, StubRoute>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    dropped_pending: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_json(self, reference: &str, value: Value) -> Self {
        self.with_json_after(reference, value, 0)
    }

    pub(crate) fn with_json_after(self, reference: &str, value: Value, delay: usize) -> Self {
        self.route(reference, StubReply::Body(value.to_string()), delay)
    }

    pub(crate) fn with_body(self, reference: &str, body: &str) -> Self {
        self.route(reference, StubReply::Body(body.to_string()), 0)
    }

    pub(crate) fn with_failure(self, reference: &str, failure: FetchFailure) -> Self {
        self.route(reference, StubReply::Fail(failure), 0)
    }

    pub(crate) fn never_responding(self, reference: &str) -> Self {
        self.route(reference, StubReply::Never, 0)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Number of never-answering fetches that were dropped while pending.
    pub(crate) fn dropped_pending(&self) -> usize {
        self.dropped_pending.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn route(mut self, reference: &str, reply: StubReply, delay: usize) -> Self {
        self.routes.insert(reference.to_string(), StubRoute { reply, delay });
        self
    }
}

struct CountGuard<'a>(&'a AtomicUsize);

impl Drop for CountGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(current)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceFetcher for StubFetcher {
    async fn get_text(&self, reference: &str) -> Result<String, FetchFailure> {
        self.requests.lock().expect("requests lock").push(reference.to_string());
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        let Some(route) = self.routes.get(reference) else {
            return Err(FetchFailure::status(reference, 404));
        };

        for _ in 0..=route.delay {
            tokio::task::yield_now().await;
        }

        match &route.reply {
            StubReply::Body(body) => Ok(body.clone()),
            StubReply::Fail(failure) => Err(failure.clone()),
            StubReply::Never => {
                let _dropped = CountGuard(&self.dropped_pending);
                std::future::pending().await
            }
        }
    }
}

/// Luke Skywalker, Tatooine and the first two films, keyed by relative path.
pub(crate) fn luke_fixture() -> StubFetcher {
    StubFetcher::new()
        .with_json(
            "/people/1",
            json!({
                "name": "Luke Skywalker",
                "height": "172",
                "mass": "77",
                "gender": "male",
                "homeworld": "/planets/1",
                "films": ["/films/1", "/films/2"],
                "url": "/people/1"
            }),
        )
        .with_json("/planets/1", json!({ "name": "Tatooine", "climate": "arid", "population": "200000" }))
        .with_json(
            "/films/1",
            json!({ "title": "A New Hope", "episode_id": 4, "director": "George Lucas", "release_date": "1977-05-25" }),
        )
        .with_json(
            "/films/2",
            json!({ "title": "The Empire Strikes Back", "episode_id": 5, "director": "Irvin Kershner", "release_date": "1980-05-17" }),
        )
}

pub(crate) fn luke_info() -> PersonInfo {
    PersonInfo {
        name: "Luke Skywalker".into(),
        height: "172".into(),
        gender: "male".into(),
        homeworld: "Tatooine".into(),
        films: vec![
            Film {
                title: "A New Hope".into(),
                director: "George Lucas".into(),
                release_date: "1977-05-25".into(),
            },
            Film {
                title: "The Empire Strikes Back".into(),
                director: "Irvin Kershner".into(),
                release_date: "1980-05-17".into(),
            },
        ],
    }
}
