// src/crawl/normalize.rs
// =============================================================================
// Turns a raw href into a frontier entry, or rejects it.
//
// Steps:
// 1. Resolve against the page the link was found on (relative paths,
//    protocol-relative "//host/x" and absolute URLs all go through join)
// 2. Drop the #fragment, so /a#x and /a#y are the same page
// 3. Keep only http/https URLs on exactly the crawl's host
//
// This is a pure function: the caller decides whether to enqueue.
// =============================================================================

use url::Url;

/// Resolves `href` against `base` and scopes it to `host`.
///
/// Returns `None` for empty hrefs, unparseable hrefs, non-HTTP schemes
/// (mailto:, javascript:, ...) and any URL whose host is not exactly `host`
/// (no subdomain folding: `www.example.com` is not `example.com`).
pub fn normalize(href: &str, base: &Url, host: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    url.set_fragment(None);

    if url.host_str() != Some(host) {
        return None;
    }

    Some(url.into())
}
