// src/fetch/mod.rs
// =============================================================================
// This module holds the capabilities the crawler relies on but does not own:
//
// Submodules:
// - http: Fetches a URL over HTTP and classifies what happened
// - html: Pulls raw href values out of anchor tags
// - sitemap: Reads sitemap XML into a list of locations
//
// The crawl core only ever talks to the `Fetcher` trait, so tests can swap in
// an in-memory fake instead of a real network client.
//
// Rust concepts:
// - Traits: Describe a capability without naming the concrete type
// - Enums with data: One type for "success OR http error OR transport error"
// =============================================================================

mod html;
mod http;
mod sitemap;

pub use html::extract_hrefs;
pub use http::HttpFetcher;
pub use sitemap::{parse_sitemap, SitemapDocument};

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// What happened when one URL was fetched.
///
/// HTTP error statuses are NOT transport failures: a 404 or 500 still means
/// the server answered, so it arrives as `HttpError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Status in [200, 400) with the response body.
    ///
    /// `final_url` is where the body was actually served from, after any
    /// redirects the transport followed.
    Success {
        status: u16,
        final_url: String,
        body: String,
    },
    /// Status >= 400 (body is not kept, it is never parsed)
    HttpError { status: u16 },
    /// The request never produced a usable response
    TransportError(TransportFailure),
}

/// Short classification of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailure {
    /// The per-request timeout elapsed
    Timeout,
    /// Could not connect (refused, DNS, unreachable)
    #[serde(rename = "connection")]
    Connect,
    /// The redirect limit was exceeded
    Redirect,
    /// Anything else (protocol errors, body decode failures, ...)
    Other,
}

impl TransportFailure {
    /// Label written to the error log.
    pub fn label(&self) -> &'static str {
        match self {
            TransportFailure::Timeout => "timeout",
            TransportFailure::Connect => "connection",
            TransportFailure::Redirect => "redirect",
            TransportFailure::Other => "other",
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something that can fetch a URL.
///
/// Implementations must never return an error for a 4xx/5xx answer; only
/// genuine connection, timeout or protocol problems become
/// `FetchOutcome::TransportError`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}
