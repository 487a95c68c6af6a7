// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a plain struct, and the #[arg(...)]
// attributes turn each field into a positional argument or a --flag.
// =============================================================================

use crate::config::{
    default_user_agent, DEFAULT_CONCURRENCY, DEFAULT_DELAY_MS, DEFAULT_MAX_REDIRECTS,
    DEFAULT_TIMEOUT_SECS,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Enumerate every reachable page on a single website",
    long_about = "site-crawler starts from a seed URL, seeds itself from the site's sitemaps, \
                  then follows same-host links breadth-first in small polite batches. \
                  The discovered URL list (and any fetch errors) are written as CSV."
)]
pub struct Cli {
    /// Seed URL to start from (e.g., https://example.com/)
    ///
    /// Its host is the only host that will be crawled
    pub seed_url: Option<String>,

    /// Maximum number of fetches in flight per batch
    ///
    /// Careful raising this: it multiplies the load on the target server
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value_t = default_user_agent())]
    pub user_agent: String,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum redirects followed per request
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Sitemap path to probe under the seed (repeatable)
    ///
    /// Defaults to sitemap.xml and sitemap_index.xml
    #[arg(long = "sitemap-path", value_name = "PATH")]
    pub sitemap_paths: Vec<String>,

    /// Skip sitemap discovery and crawl from links only
    #[arg(long)]
    pub no_sitemap: bool,

    /// Directory for the URL list
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Directory for the error log
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Print the final summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
