// src/crawl/mod.rs
// =============================================================================
// This module is the crawl core.
//
// Submodules (leaves first):
// - normalize: href -> absolute, fragment-free, same-host URL (or nothing)
// - frontier: FIFO of pending URLs + the set of everything ever enqueued
// - sitemap: best-effort seeding from sitemap.xml / sitemap indexes
// - batch: the bounded-concurrency fetch loop
// - sink: the visited list and error records a run produces
//
// A run goes Seeding -> Crawling -> Drained.
// =============================================================================

mod batch;
mod frontier;
mod normalize;
mod sink;
mod sitemap;

#[cfg(test)]
mod fake;

pub use batch::{BatchProgress, Crawler};
pub use sink::{CrawlReport, ErrorReason, ErrorRecord};

use crate::config::{CrawlConfig, CrawlContext};
use crate::fetch::Fetcher;
use tracing::info;

/// Runs both phases: sitemap seeding (unless disabled), then the link crawl.
pub async fn crawl_site<F, P>(
    fetcher: &F,
    ctx: CrawlContext,
    config: &CrawlConfig,
    on_batch: P,
) -> CrawlReport
where
    F: Fetcher + ?Sized,
    P: FnMut(&BatchProgress),
{
    let mut crawler = Crawler::new(fetcher, ctx);

    if config.use_sitemaps {
        let stats = crawler.seed_from_sitemaps(&config.sitemap_paths).await;
        if stats.sitemaps == 0 {
            info!(phase = ?crawler.phase(), "no sitemap found, crawling from links only");
        }
    }

    crawler.crawl(on_batch).await
}
