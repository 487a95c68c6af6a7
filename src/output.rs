// src/output.rs
// =============================================================================
// Writes the run's CSV artifacts.
//
// - URL list:  <output-dir>/<host>_<YYYYmmdd_HHMMSS>.csv
//              one quoted URL per row, no header, in enqueue order
// - Error log: <log-dir>/<host>_<YYYYmmdd_HHMMSS>_errors.csv
//              header "URL,Error", only written when there are errors
//
// The host is sanitized so it is always a safe file name.
// =============================================================================

use crate::config::CrawlConfig;
use crate::crawl::{CrawlReport, ErrorRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use csv::{QuoteStyle, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a run's files go. Decided up front so they can be announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub urls: PathBuf,
    pub errors: PathBuf,
}

impl OutputPaths {
    pub fn new(config: &CrawlConfig, host: &str, started: DateTime<Local>) -> Self {
        let stem = format!("{}_{}", sanitize_host(host), started.format("%Y%m%d_%H%M%S"));
        Self {
            urls: config.output_dir.join(format!("{stem}.csv")),
            errors: config.log_dir.join(format!("{stem}_errors.csv")),
        }
    }
}

/// Files actually written by `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub urls: PathBuf,
    /// None when the run had no errors
    pub errors: Option<PathBuf>,
}

/// Replaces every character outside `[A-Za-z0-9-]` with `_`.
pub fn sanitize_host(host: &str) -> String {
    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Writes the URL list and, if needed, the error log.
pub fn save(report: &CrawlReport, paths: &OutputPaths) -> Result<SavedFiles> {
    write_url_list(&paths.urls, &report.visited)?;

    let errors = if report.errors.is_empty() {
        None
    } else {
        write_error_log(&paths.errors, &report.errors)?;
        Some(paths.errors.clone())
    };

    Ok(SavedFiles {
        urls: paths.urls.clone(),
        errors,
    })
}

pub fn write_url_list(path: &Path, urls: &[String]) -> Result<()> {
    ensure_parent(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for url in urls {
        writer.write_record([url])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_error_log(path: &Path, errors: &[ErrorRecord]) -> Result<()> {
    ensure_parent(path)?;

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(["URL", "Error"])?;
    for record in errors {
        let reason = record.reason.to_string();
        writer.write_record([record.url.as_str(), reason.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::ErrorReason;
    use crate::fetch::TransportFailure;
    use chrono::TimeZone;

    fn report(errors: Vec<ErrorRecord>) -> CrawlReport {
        CrawlReport {
            seed: "http://example.com/".to_string(),
            host: "example.com".to_string(),
            visited: vec![
                "http://example.com/".to_string(),
                "http://example.com/broken".to_string(),
            ],
            errors,
            batches: 1,
        }
    }

    fn paths_in(dir: &Path) -> OutputPaths {
        let config = CrawlConfig {
            output_dir: dir.join("output"),
            log_dir: dir.join("logs"),
            ..CrawlConfig::default()
        };
        let started = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        OutputPaths::new(&config, "example.com", started)
    }

    #[test]
    fn test_sanitize_host() {
        assert_eq!(sanitize_host("example.com"), "example_com");
        assert_eq!(sanitize_host("my-site.co.uk"), "my-site_co_uk");
        assert_eq!(sanitize_host("[::1]"), "___1_");
    }

    #[test]
    fn test_file_names() {
        let paths = paths_in(Path::new("/tmp/x"));
        assert_eq!(
            paths.urls,
            PathBuf::from("/tmp/x/output/example_com_20240305_140709.csv")
        );
        assert_eq!(
            paths.errors,
            PathBuf::from("/tmp/x/logs/example_com_20240305_140709_errors.csv")
        );
    }

    #[test]
    fn test_save_without_errors_skips_error_log() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());

        let saved = save(&report(Vec::new()), &paths).unwrap();

        assert_eq!(saved.errors, None);
        assert!(!paths.errors.exists());
        let urls = fs::read_to_string(&saved.urls).unwrap();
        assert_eq!(urls, "\"http://example.com/\"\n\"http://example.com/broken\"\n");
    }

    #[test]
    fn test_save_writes_error_log() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        let errors = vec![
            ErrorRecord {
                url: "http://example.com/broken".to_string(),
                reason: ErrorReason::Status(500),
            },
            ErrorRecord {
                url: "http://example.com/slow".to_string(),
                reason: ErrorReason::Transport(TransportFailure::Timeout),
            },
        ];

        let saved = save(&report(errors), &paths).unwrap();

        let log = fs::read_to_string(saved.errors.unwrap()).unwrap();
        assert_eq!(
            log,
            "URL,Error\nhttp://example.com/broken,500\nhttp://example.com/slow,timeout\n"
        );
    }
}
