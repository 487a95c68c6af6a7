// src/crawl/sitemap.rs
// =============================================================================
// Sitemap seeding: the best-effort first phase of a run.
//
// How it works:
// 1. Probe each conventional path under the seed (sitemap.xml, ...)
// 2. A sitemap index sends us into each nested sitemap it lists
// 3. A URL list puts each page straight into the frontier (marked seen)
//
// Anything that goes wrong (non-200, network failure, not XML) just means
// "no sitemap here". This phase never fails the run: the link crawl that
// follows will still find pages from the seed.
//
// Cyclic indexes are cut off by `seen_sitemaps`, which every sitemap
// location is added to before it is fetched.
// =============================================================================

use super::frontier::Frontier;
use super::normalize::normalize;
use crate::config::CrawlContext;
use crate::fetch::{parse_sitemap, FetchOutcome, Fetcher, SitemapDocument};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

/// Counts from one discovery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SitemapStats {
    /// Sitemap documents fetched and parsed successfully
    pub sitemaps: usize,
    /// New URLs put into the frontier
    pub seeded: usize,
}

/// Probes `paths` under the seed and seeds `frontier` from what is found.
pub async fn discover<F>(
    fetcher: &F,
    ctx: &CrawlContext,
    paths: &[String],
    frontier: &mut Frontier,
) -> SitemapStats
where
    F: Fetcher + ?Sized,
{
    let mut seen_sitemaps = HashSet::new();
    let mut stats = SitemapStats::default();

    for path in paths {
        let probe = probe_url(&ctx.seed, path);
        descend(fetcher, ctx, probe, frontier, &mut seen_sitemaps, &mut stats).await;
    }

    info!(
        sitemaps = stats.sitemaps,
        seeded = stats.seeded,
        "sitemap discovery finished"
    );
    stats
}

// Appends `path` to the seed's path, dropping any query or fragment.
//
// http://h/blog/?x=1 + sitemap.xml -> http://h/blog/sitemap.xml
fn probe_url(seed: &Url, path: &str) -> String {
    let mut url = seed.clone();
    url.set_query(None);
    url.set_fragment(None);
    let dir = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{}/{}", dir, path.trim_start_matches('/')));
    url.into()
}

// Walks one sitemap and everything nested below it, depth first.
//
// An explicit stack instead of async recursion; `seen_sitemaps` is shared
// across every probe of the run.
async fn descend<F>(
    fetcher: &F,
    ctx: &CrawlContext,
    root: String,
    frontier: &mut Frontier,
    seen_sitemaps: &mut HashSet<String>,
    stats: &mut SitemapStats,
) where
    F: Fetcher + ?Sized,
{
    let mut stack = vec![root];

    while let Some(location) = stack.pop() {
        if !seen_sitemaps.insert(location.clone()) {
            continue;
        }

        let Some(document) = load(fetcher, &location).await else {
            continue;
        };
        stats.sitemaps += 1;

        match document {
            SitemapDocument::Index(nested) => {
                // Reversed so the first listed sitemap is visited first
                for loc in nested.into_iter().rev() {
                    let Some(loc) = normalize(&loc, &ctx.seed, &ctx.host) else {
                        debug!(sitemap = %location, nested = %loc, "skipping off-host sitemap");
                        continue;
                    };
                    if seen_sitemaps.contains(&loc) || frontier.contains(&loc) {
                        continue;
                    }
                    info!("Discovered nested sitemap: {}", loc);
                    stack.push(loc);
                }
            }
            SitemapDocument::UrlSet(pages) => {
                for loc in pages {
                    let Some(url) = normalize(&loc, &ctx.seed, &ctx.host) else {
                        debug!(sitemap = %location, url = %loc, "skipping off-host URL");
                        continue;
                    };
                    if frontier.enqueue(url.clone()) {
                        debug!("Discovered URL from sitemap: {}", url);
                        stats.seeded += 1;
                    }
                }
            }
        }
    }
}

// Fetches and parses one sitemap; None means "no sitemap here".
async fn load<F>(fetcher: &F, location: &str) -> Option<SitemapDocument>
where
    F: Fetcher + ?Sized,
{
    match fetcher.fetch(location).await {
        FetchOutcome::Success {
            status: 200, body, ..
        } => match parse_sitemap(body.as_bytes()) {
            Ok(document) => {
                info!(
                    sitemap = location,
                    index = document.is_index(),
                    entries = document.locations().len(),
                    "found sitemap"
                );
                Some(document)
            }
            Err(e) => {
                info!(sitemap = location, error = %e, "sitemap unavailable: unparseable");
                None
            }
        },
        FetchOutcome::Success { status, .. } | FetchOutcome::HttpError { status } => {
            debug!(sitemap = location, status, "sitemap unavailable");
            None
        }
        FetchOutcome::TransportError(failure) => {
            info!(sitemap = location, %failure, "sitemap unavailable: transport failure");
            None
        }
    }
}
