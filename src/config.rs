// src/config.rs
// =============================================================================
// Run configuration.
//
// - CrawlConfig: every option the user can set, with sensible defaults
// - CrawlContext: the immutable scope of one run (seed, host, limits),
//   derived from the config and the seed URL before any network activity
// =============================================================================

use crate::cli::Cli;
use crate::error::CrawlError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default number of fetches in flight per batch.
///
/// Keep this low: every extra slot is extra load on the target host.
pub const DEFAULT_CONCURRENCY: usize = 2;
pub const DEFAULT_DELAY_MS: u64 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_SITEMAP_PATHS: [&str; 2] = ["sitemap.xml", "sitemap_index.xml"];

/// Every option recognized for a run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub concurrency: usize,
    pub inter_batch_delay: Duration,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    /// Probe paths appended to the seed during sitemap discovery
    pub sitemap_paths: Vec<String>,
    pub use_sitemaps: bool,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            inter_batch_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            user_agent: default_user_agent(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            sitemap_paths: DEFAULT_SITEMAP_PATHS.iter().map(|p| p.to_string()).collect(),
            use_sitemaps: true,
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("site-crawler/{} (+https://example.com)", env!("CARGO_PKG_VERSION"))
}

impl CrawlConfig {
    /// Builds the config from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CrawlError> {
        if cli.concurrency == 0 {
            return Err(CrawlError::Usage(
                "--concurrency must be at least 1".to_string(),
            ));
        }

        let sitemap_paths = if cli.sitemap_paths.is_empty() {
            Self::default().sitemap_paths
        } else {
            cli.sitemap_paths.clone()
        };

        Ok(Self {
            concurrency: cli.concurrency,
            inter_batch_delay: Duration::from_millis(cli.delay_ms),
            user_agent: cli.user_agent.clone(),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            max_redirects: cli.max_redirects,
            sitemap_paths,
            use_sitemaps: !cli.no_sitemap,
            output_dir: cli.output_dir.clone(),
            log_dir: cli.log_dir.clone(),
        })
    }
}

/// The fixed scope of one crawl.
#[derive(Debug, Clone)]
pub struct CrawlContext {
    pub seed: Url,
    /// Host component of the seed; links must match it exactly
    pub host: String,
    pub concurrency: usize,
    pub inter_batch_delay: Duration,
}

impl CrawlContext {
    /// Validates the seed and captures the run's limits.
    pub fn new(seed: &str, config: &CrawlConfig) -> Result<Self, CrawlError> {
        let mut seed_url = Url::parse(seed).map_err(|e| CrawlError::InvalidSeed {
            url: seed.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(seed_url.scheme(), "http" | "https") {
            return Err(CrawlError::InvalidSeed {
                url: seed.to_string(),
                reason: format!("unsupported scheme '{}'", seed_url.scheme()),
            });
        }

        let host = seed_url
            .host_str()
            .ok_or_else(|| CrawlError::InvalidSeed {
                url: seed.to_string(),
                reason: "URL has no host".to_string(),
            })?
            .to_string();

        seed_url.set_fragment(None);

        Ok(Self {
            seed: seed_url,
            host,
            concurrency: config.concurrency.max(1),
            inter_batch_delay: config.inter_batch_delay,
        })
    }
}
