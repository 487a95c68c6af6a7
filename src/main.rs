// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the seed and build the run configuration
// 3. Seed from sitemaps, then crawl same-host links in batches
// 4. Save the URL list (and error log) and print a summary
// 5. Exit with proper code (0 = crawl completed, 1 = usage error, 2 = error)
//
// Per-page failures never change the exit code: they end up in the error log.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod fetch;
mod output;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use cli::Cli;
use config::{CrawlConfig, CrawlContext};
use crawl::{BatchProgress, CrawlReport};
use error::CrawlError;
use fetch::HttpFetcher;
use output::{OutputPaths, SavedFiles};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<CrawlError>()
                .map(CrawlError::exit_code)
                .unwrap_or(2)
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so they never mix with the summary on stdout.
// RUST_LOG wins over --verbose when set.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("site_crawler={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Everything that can be rejected before touching the network
fn prepare(cli: &Cli) -> Result<(CrawlConfig, CrawlContext), CrawlError> {
    let seed = cli
        .seed_url
        .as_deref()
        .ok_or_else(|| CrawlError::Usage("site-crawler <SEED_URL>".to_string()))?;

    let config = CrawlConfig::from_cli(cli)?;
    let ctx = CrawlContext::new(seed, &config)?;
    Ok((config, ctx))
}

async fn run(cli: Cli) -> Result<i32> {
    let (config, ctx) = prepare(&cli)?;
    let paths = OutputPaths::new(&config, &ctx.host, Local::now());
    let fetcher = HttpFetcher::new(&config)?;

    if !cli.json {
        println!("🔍 Starting full crawl on: {}", ctx.seed);
        println!("📄 Output file: {}", paths.urls.display());
        println!("📋 Error log: {}", paths.errors.display());
    }

    let json = cli.json;
    let report = crawl::crawl_site(&fetcher, ctx, &config, |progress| {
        if !json {
            print_progress(progress);
        }
    })
    .await;

    if !json {
        println!("\n✅ Crawl finished. Saving results...");
    }

    let saved = output::save(&report, &paths)?;

    if json {
        let summary = RunSummary::new(&report, &saved);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&report, &saved);
    }

    Ok(0)
}

// Overwrites the same terminal line after each batch
fn print_progress(progress: &BatchProgress) {
    print!("\r   {}", progress_line(progress));
    let _ = std::io::stdout().flush();
}

// `visited` counts every URL enqueued so far, fetched or still queued
fn progress_line(progress: &BatchProgress) -> String {
    format!(
        "Batch {}: Discovered: {} | Errors: {} | Queued: {}",
        progress.batch, progress.visited, progress.errors, progress.pending
    )
}

fn print_summary(report: &CrawlReport, saved: &SavedFiles) {
    match &saved.errors {
        Some(path) => println!(
            "❌ Saved error log: {} ({} errors)",
            path.display(),
            report.errors.len()
        ),
        None => println!("🎉 No errors found!"),
    }

    println!();
    println!("📊 Summary:");
    println!("   🌐 Host: {}", report.host);
    println!("   📋 Total URLs: {}", report.visited.len());
    println!("   ❌ Errors: {}", report.errors.len());
    println!("   📦 Batches: {}", report.batches);
    println!("   💾 Saved to: {}", saved.urls.display());
}

/// Machine-readable result, printed with --json.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    seed: &'a str,
    host: &'a str,
    total_urls: usize,
    total_errors: usize,
    batches: usize,
    url_file: &'a PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_file: Option<&'a PathBuf>,
    errors: &'a [crawl::ErrorRecord],
}

impl<'a> RunSummary<'a> {
    fn new(report: &'a CrawlReport, saved: &'a SavedFiles) -> Self {
        Self {
            seed: &report.seed,
            host: &report.host,
            total_urls: report.visited.len(),
            total_errors: report.errors.len(),
            batches: report.batches,
            url_file: &saved.urls,
            error_file: saved.errors.as_ref(),
            errors: &report.errors,
        }
    }
}
