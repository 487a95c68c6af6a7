// src/fetch/sitemap.rs
// =============================================================================
// This module reads sitemap XML.
//
// Two document shapes exist (https://www.sitemaps.org/protocol.html):
// - <urlset><url><loc>...</loc></url>...</urlset>           a list of pages
// - <sitemapindex><sitemap><loc>...</loc></sitemap>...</sitemapindex>
//                                                            a list of sitemaps
//
// We use quick-xml's pull reader: we walk the events and remember whether the
// <loc> we are inside belongs to a <url> or a <sitemap> entry.
// =============================================================================

use anyhow::{anyhow, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Locations of nested sitemap documents
    Index(Vec<String>),
    /// Locations of concrete pages
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    pub fn is_index(&self) -> bool {
        matches!(self, SitemapDocument::Index(_))
    }

    pub fn locations(&self) -> &[String] {
        match self {
            SitemapDocument::Index(locs) | SitemapDocument::UrlSet(locs) => locs,
        }
    }
}

// Which entry a <loc> currently belongs to
#[derive(Clone, Copy)]
enum Entry {
    None,
    Url,
    Sitemap,
}

/// Parses sitemap bytes.
///
/// A document with any `<sitemap>` entry is an index, even if it also has
/// `<url>` entries. Returns an error for malformed XML or for a document that
/// is neither a `<urlset>` nor a `<sitemapindex>` (e.g. an HTML error page
/// served with status 200).
pub fn parse_sitemap(bytes: &[u8]) -> Result<SitemapDocument> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut root: Option<Vec<u8>> = None;
    let mut depth = 0usize;
    let mut entry = Entry::None;
    let mut entry_depth = 0usize;
    // Depth of the <loc> being read, if it is a direct child of the entry
    let mut loc_depth: Option<usize> = None;
    let mut loc = String::new();

    let mut page_locs = Vec::new();
    let mut sitemap_locs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if root.is_none() {
                    root = Some(e.local_name().as_ref().to_vec());
                }
                // Qualified names: <image:loc> and friends are not ours
                match (e.name().as_ref(), entry) {
                    (b"url", Entry::None) => {
                        entry = Entry::Url;
                        entry_depth = depth;
                    }
                    (b"sitemap", Entry::None) => {
                        entry = Entry::Sitemap;
                        entry_depth = depth;
                    }
                    (b"loc", Entry::Url | Entry::Sitemap) if depth == entry_depth + 1 => {
                        loc_depth = Some(depth);
                        loc.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                if root.is_none() {
                    root = Some(e.local_name().as_ref().to_vec());
                }
            }
            Ok(Event::Text(e)) if loc_depth.is_some() => {
                let text = e
                    .unescape()
                    .map_err(|err| anyhow!("bad text in <loc>: {err}"))?;
                loc.push_str(&text);
            }
            Ok(Event::CData(e)) if loc_depth.is_some() => {
                loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) => {
                if loc_depth == Some(depth) {
                    loc_depth = None;
                    let value = loc.trim();
                    if !value.is_empty() {
                        match entry {
                            Entry::Url => page_locs.push(value.to_string()),
                            Entry::Sitemap => sitemap_locs.push(value.to_string()),
                            Entry::None => {}
                        }
                    }
                } else if !matches!(entry, Entry::None) && depth == entry_depth {
                    entry = Entry::None;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "sitemap XML parse error at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if !sitemap_locs.is_empty() {
        return Ok(SitemapDocument::Index(sitemap_locs));
    }

    match root.as_deref() {
        Some(b"sitemapindex") => Ok(SitemapDocument::Index(Vec::new())),
        Some(b"urlset") => Ok(SitemapDocument::UrlSet(page_locs)),
        _ if !page_locs.is_empty() => Ok(SitemapDocument::UrlSet(page_locs)),
        Some(other) => Err(anyhow!(
            "not a sitemap: root element <{}>",
            String::from_utf8_lossy(other)
        )),
        None => Err(anyhow!("not a sitemap: no root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>http://example.com/p1</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc> http://example.com/p2 </loc></url>
</urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert!(!doc.is_index());
        assert_eq!(
            doc.locations(),
            &["http://example.com/p1".to_string(), "http://example.com/p2".to_string()]
        );
    }

    #[test]
    fn test_parse_index() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>http://example.com/sitemap1.xml</loc></sitemap>
  <sitemap><loc>http://example.com/sitemap2.xml</loc></sitemap>
</sitemapindex>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::Index(vec![
                "http://example.com/sitemap1.xml".to_string(),
                "http://example.com/sitemap2.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_image_extension_locs_are_not_pages() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>http://example.com/p1</loc>
    <image:image><image:loc>http://example.com/img/a.jpg</image:loc></image:image>
  </url>
</urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(doc, SitemapDocument::UrlSet(vec!["http://example.com/p1".to_string()]));
    }

    #[test]
    fn test_nested_loc_is_ignored() {
        let xml = br#"<urlset><url><loc>http://example.com/p1</loc>
            <extra><loc>http://example.com/deep</loc></extra></url></urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(doc.locations(), &["http://example.com/p1".to_string()]);
    }

    #[test]
    fn test_unescapes_entities() {
        let xml = br#"<urlset><url><loc>http://example.com/?a=1&amp;b=2</loc></url></urlset>"#;
        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(doc.locations(), &["http://example.com/?a=1&b=2".to_string()]);
    }

    #[test]
    fn test_empty_urlset_is_valid() {
        let doc = parse_sitemap(b"<urlset></urlset>").unwrap();
        assert_eq!(doc, SitemapDocument::UrlSet(Vec::new()));
    }

    #[test]
    fn test_html_page_is_rejected() {
        let html = b"<html><body><h1>Not Found</h1></body></html>";
        assert!(parse_sitemap(html).is_err());
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(parse_sitemap(b"<urlset><url><loc>x</url></urlset>").is_err());
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert!(parse_sitemap(b"").is_err());
    }
}
