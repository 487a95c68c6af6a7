// src/crawl/batch.rs
// =============================================================================
// The crawl loop: drains the frontier in bounded batches.
//
// How it works:
// 1. Take up to `concurrency` URLs off the front of the frontier
// 2. Fetch them all concurrently (never more than `concurrency` in flight)
// 3. Handle each outcome as it completes, one at a time:
//    - 2xx/3xx: extract links, normalize them, enqueue the new ones
//    - >= 400:  record the status as an error, don't parse the body
//    - transport failure: record its short label
// 4. Wait until every fetch of the batch resolved, then sleep the
//    politeness delay, then report running totals
// 5. Repeat until the frontier is empty
//
// The frontier and the error list are only ever touched from this loop, one
// outcome at a time, so there is no shared mutable state between fetches.
// A batch is atomic: batch N+1 is not drawn before batch N fully resolved.
//
// Known limitation: when the transport follows a redirect to another host,
// the page is still parsed. Its links are scoped to our host, so the crawl
// does not leave the site, but that one fetch did.
// =============================================================================

use super::frontier::Frontier;
use super::normalize::normalize;
use super::sink::{CrawlReport, ErrorReason, ResultSink};
use super::sitemap::{self, SitemapStats};
use crate::config::CrawlContext;
use crate::fetch::{extract_hrefs, FetchOutcome, Fetcher};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use url::Url;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    Crawling,
    Drained,
}

/// Running totals, reported after every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based batch number
    pub batch: usize,
    pub batch_size: usize,
    pub visited: usize,
    pub errors: usize,
    pub pending: usize,
}

/// Drives one crawl from seed to drained frontier.
pub struct Crawler<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    ctx: CrawlContext,
    frontier: Frontier,
    sink: ResultSink,
    phase: Phase,
    batches: usize,
}

impl<'a, F: Fetcher + ?Sized> Crawler<'a, F> {
    /// Creates a crawler with the seed already queued.
    pub fn new(fetcher: &'a F, ctx: CrawlContext) -> Self {
        let mut frontier = Frontier::new();
        frontier.enqueue(ctx.seed.to_string());

        Self {
            fetcher,
            ctx,
            frontier,
            sink: ResultSink::new(),
            phase: Phase::Seeding,
            batches: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seeds the frontier from sitemaps found under the seed.
    pub async fn seed_from_sitemaps(&mut self, paths: &[String]) -> SitemapStats {
        sitemap::discover(self.fetcher, &self.ctx, paths, &mut self.frontier).await
    }

    /// Runs the BFS phase to completion and returns the report.
    ///
    /// `on_batch` is called after every batch with the running totals.
    pub async fn crawl<P>(mut self, mut on_batch: P) -> CrawlReport
    where
        P: FnMut(&BatchProgress),
    {
        self.enter(Phase::Crawling);

        while !self.frontier.is_empty() {
            let batch = self.frontier.dequeue_batch(self.ctx.concurrency);
            let batch_size = batch.len();
            self.batches += 1;

            self.run_batch(batch).await;

            // Politeness: one fixed pause per batch, skipped when nothing is left
            if !self.frontier.is_empty() && !self.ctx.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.ctx.inter_batch_delay).await;
            }

            let progress = BatchProgress {
                batch: self.batches,
                batch_size,
                visited: self.frontier.seen_len(),
                errors: self.sink.error_count(),
                pending: self.frontier.pending_len(),
            };
            debug!(?progress, "batch complete");
            on_batch(&progress);
        }

        self.enter(Phase::Drained);

        let batches = self.batches;
        let seed = self.ctx.seed.to_string();
        let visited = self.frontier.into_visited();
        self.sink.finish(seed, self.ctx.host, visited, batches)
    }

    // Fetches one batch concurrently and folds each outcome in as it lands.
    async fn run_batch(&mut self, batch: Vec<String>) {
        let fetcher = self.fetcher;
        let limit = batch.len().max(1);

        let mut outcomes = stream::iter(batch)
            .map(|url| async move {
                let outcome = fetcher.fetch(&url).await;
                (url, outcome)
            })
            .buffer_unordered(limit);

        while let Some((url, outcome)) = outcomes.next().await {
            self.handle_outcome(url, outcome);
        }
    }

    fn handle_outcome(&mut self, url: String, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Success {
                status,
                final_url,
                body,
            } if (200..400).contains(&status) => {
                // Relative links are relative to where the body came from
                let added = self.enqueue_links(&final_url, &body);
                debug!(%url, %final_url, status, added, "fetched");
            }
            FetchOutcome::Success { status, .. } => {
                debug!(%url, status, "unexpected status, body not parsed");
            }
            FetchOutcome::HttpError { status } => {
                warn!(%url, status, "HTTP error");
                self.sink.record(url, ErrorReason::Status(status));
            }
            FetchOutcome::TransportError(failure) => {
                warn!(%url, %failure, "fetch failed");
                self.sink.record(url, ErrorReason::Transport(failure));
            }
        }
    }

    // Returns how many new URLs went into the frontier.
    fn enqueue_links(&mut self, page_url: &str, body: &str) -> usize {
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(e) => {
                warn!(url = page_url, error = %e, "cannot resolve links against page URL");
                return 0;
            }
        };

        let mut added = 0;
        for href in extract_hrefs(body) {
            if let Some(link) = normalize(&href, &base, &self.ctx.host) {
                if self.frontier.enqueue(link) {
                    added += 1;
                }
            }
        }
        added
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = ?self.phase, to = ?phase, "crawl phase");
        self.phase = phase;
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered instead of spawning tasks?
//    - The fetch futures borrow the fetcher, so no 'static bound is needed
//    - Results come back in completion order, and we handle each one right
//      away inside this single loop, so the frontier needs no Mutex
//
// 2. Why is `crawl` taking `mut self`?
//    - A crawler runs exactly once; consuming it lets us move the frontier
//      and the sink into the final report without cloning
//
// 3. What is FnMut(&BatchProgress)?
//    - A callback that may mutate what it captured (e.g. push to a Vec)
//    - main.rs uses it to print progress, tests use it to record batches
// -----------------------------------------------------------------------------
