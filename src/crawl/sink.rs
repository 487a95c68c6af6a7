// src/crawl/sink.rs
// =============================================================================
// Collects what a run produced: the visited URL list and the error records.
//
// No dedup happens here. The frontier already guarantees each URL shows up
// once, and each URL is fetched once, so it can fail at most once.
// =============================================================================

use crate::fetch::TransportFailure;
use serde::Serialize;
use std::fmt;

/// Why a URL ended up in the error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorReason {
    /// The server answered with status >= 400
    Status(u16),
    /// The request failed below HTTP
    Transport(TransportFailure),
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorReason::Status(status) => write!(f, "{status}"),
            ErrorReason::Transport(failure) => f.write_str(failure.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub url: String,
    pub reason: ErrorReason,
}

/// The finished result of a crawl, read-only from here on.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub host: String,
    /// Every URL enqueued during the run, including ones that later failed
    pub visited: Vec<String>,
    pub errors: Vec<ErrorRecord>,
    pub batches: usize,
}

#[derive(Debug, Default)]
pub struct ResultSink {
    errors: Vec<ErrorRecord>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, url: String, reason: ErrorReason) {
        self.errors.push(ErrorRecord { url, reason });
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn finish(self, seed: String, host: String, visited: Vec<String>, batches: usize) -> CrawlReport {
        CrawlReport {
            seed,
            host,
            visited,
            errors: self.errors,
            batches,
        }
    }
}
