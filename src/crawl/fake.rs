// src/crawl/fake.rs
// In-memory Fetcher for crawl tests: canned outcomes, 404 for anything else.

use crate::fetch::{FetchOutcome, Fetcher, TransportFailure};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, FetchOutcome>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.redirect(url, url, body)
    }

    /// `url` answers with `body`, served from `final_url`.
    pub fn redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchOutcome::Success {
                status: 200,
                final_url: final_url.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), FetchOutcome::HttpError { status });
        self
    }

    pub fn failure(mut self, url: &str, failure: TransportFailure) -> Self {
        self.responses
            .insert(url.to_string(), FetchOutcome::TransportError(failure));
        self
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        self.requests.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Give sibling fetches a chance to start
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.responses
            .get(url)
            .cloned()
            .unwrap_or(FetchOutcome::HttpError { status: 404 })
    }
}
