// src/error.rs
// =============================================================================
// Fatal errors: the only failures that stop a run.
//
// Per-URL problems (bad status, timeouts, missing sitemaps) are NOT errors in
// this sense. They are recorded as values and the crawl keeps going.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Bad or missing command-line input; nothing has touched the network yet
    #[error("usage: {0}")]
    Usage(String),

    /// The seed URL cannot define a crawl scope
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },
}

impl CrawlError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrawlError::Usage(_) | CrawlError::InvalidSeed { .. } => 1,
        }
    }
}
