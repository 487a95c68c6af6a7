// src/fetch/html.rs
// =============================================================================
// This module pulls raw link targets out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, Mozilla's HTML parser)
// - Supports CSS selectors for finding elements
//
// Resolution, fragment stripping and host checks are NOT done here: the
// crawl core's normalizer owns those. This function only reports exactly
// what each <a href="..."> says.
// =============================================================================

use scraper::{Html, Selector};
use std::sync::LazyLock;

// "a[href]" means "all <a> tags that have an href attribute"
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Returns the raw `href` value of every anchor in `body`, in document order.
///
/// Example:
///   body = "<a href='/docs'>Docs</a><a href='#top'>Top</a>"
///   result = ["/docs", "#top"]
pub fn extract_hrefs(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}
