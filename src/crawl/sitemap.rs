//! Sitemap document parsing.
//!
//! Streams one sitemap XML body and pulls out `<loc>` values, splitting
//! page URLs from child sitemap pointers by the element that wraps them.

/// One fetched sitemap document, reduced to the URLs it lists.
///
/// A `<loc>` wrapped by `<sitemap>` is a pointer to another sitemap;
/// a `<loc>` wrapped by `<url>` (or sitting directly under the root
/// container) is a page URL. Classification is positional only, never
/// based on how the URL string looks. Both lists preserve document order.
#[derive(Debug, Clone)]
pub struct SitemapNode {
    /// The URL this document was fetched from.
    pub source_url: String,
    /// Page URLs listed by leaf entries.
    pub page_urls: Vec<String>,
    /// URLs of nested sitemaps to descend into.
    pub child_sitemaps: Vec<String>,
}

impl SitemapNode {
    pub fn empty(source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            page_urls: Vec::new(),
            child_sitemaps: Vec::new(),
        }
    }
}

/// Parse a sitemap or sitemap-index body into a [`SitemapNode`].
///
/// Works on `<urlset>`, `<sitemapindex>`, and mixed documents alike: every
/// `<loc>` is collected and classified by its parent element, so a document
/// mixing leaf entries and nested pointers yields both. Extension `<loc>`
/// tags (e.g. `image:loc` inside `image:image`) are not page URLs and are
/// skipped. A document with no `<loc>` at all parses to an empty node;
/// malformed XML is an error.
pub fn parse(source_url: &str, xml: &str) -> Result<SitemapNode, quick_xml::Error> {
    let mut node = SitemapNode::empty(source_url);
    // Local names of the currently open elements, root first.
    let mut open: Vec<String> = Vec::new();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            quick_xml::events::Event::Start(ref e) => {
                open.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
            }
            quick_xml::events::Event::Text(ref e) => {
                let text = e.unescape()?.trim().to_string();
                classify_loc(&open, text, &mut node);
            }
            quick_xml::events::Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).trim().to_string();
                classify_loc(&open, text, &mut node);
            }
            quick_xml::events::Event::End(_) => {
                open.pop();
            }
            quick_xml::events::Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(node)
}

/// Route one `<loc>` text value to the right list, or drop it.
fn classify_loc(open: &[String], text: String, node: &mut SitemapNode) {
    if text.is_empty() || open.last().map(String::as_str) != Some("loc") {
        return;
    }
    let parent = open
        .len()
        .checked_sub(2)
        .and_then(|i| open.get(i))
        .map(String::as_str);
    match parent {
        Some("sitemap") => node.child_sitemaps.push(text),
        // Leaf entry, or a bare <loc> directly under the root container.
        Some("url") | Some("urlset") | Some("sitemapindex") | None => node.page_urls.push(text),
        // Extension wrappers such as image:image or video:video.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
        <url>
            <loc>https://example.com/</loc>
            <lastmod>2026-01-10</lastmod>
            <priority>1.0</priority>
        </url>
        <url>
            <loc>https://example.com/about</loc>
        </url>
        <url>
            <loc>https://example.com/contact</loc>
        </url>
        </urlset>"#;

        let node = parse("https://example.com/sitemap.xml", xml).unwrap();
        assert_eq!(
            node.page_urls,
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/contact"
            ]
        );
        assert!(node.child_sitemaps.is_empty());
    }

    #[test]
    fn test_parse_sitemap_index() {
        let xml = r#"<?xml version="1.0"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
        <sitemap>
            <loc>https://example.com/sitemap-posts.xml</loc>
            <lastmod>2026-02-01</lastmod>
        </sitemap>
        <sitemap>
            <loc>https://example.com/sitemap-pages.xml</loc>
        </sitemap>
        </sitemapindex>"#;

        let node = parse("https://example.com/sitemap.xml", xml).unwrap();
        assert!(node.page_urls.is_empty());
        assert_eq!(
            node.child_sitemaps,
            vec![
                "https://example.com/sitemap-posts.xml",
                "https://example.com/sitemap-pages.xml"
            ]
        );
    }

    #[test]
    fn test_parse_mixed_document() {
        // Both kinds of <loc> in one body: classification is positional,
        // so page entries and child pointers are collected side by side.
        let xml = r#"<urlset>
        <url><loc>https://example.com/home</loc></url>
        <sitemap><loc>https://example.com/sitemap-extra.xml</loc></sitemap>
        <url><loc>https://example.com/blog</loc></url>
        </urlset>"#;

        let node = parse("https://example.com/sitemap.xml", xml).unwrap();
        assert_eq!(
            node.page_urls,
            vec!["https://example.com/home", "https://example.com/blog"]
        );
        assert_eq!(node.child_sitemaps, vec!["https://example.com/sitemap-extra.xml"]);
    }

    #[test]
    fn test_parse_unescapes_entities_and_cdata() {
        let xml = r#"<urlset>
        <url><loc>https://example.com/search?q=a&amp;b=2</loc></url>
        <url><loc><![CDATA[https://example.com/cdata?x=1&y=2]]></loc></url>
        </urlset>"#;

        let node = parse("https://example.com/sitemap.xml", xml).unwrap();
        assert_eq!(
            node.page_urls,
            vec![
                "https://example.com/search?q=a&b=2",
                "https://example.com/cdata?x=1&y=2"
            ]
        );
    }

    #[test]
    fn test_parse_ignores_extension_locs() {
        let xml = r#"<urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
        <url>
            <loc>https://example.com/gallery</loc>
            <image:image>
                <image:loc>https://example.com/img/photo.jpg</image:loc>
            </image:image>
        </url>
        </urlset>"#;

        let node = parse("https://example.com/sitemap.xml", xml).unwrap();
        assert_eq!(node.page_urls, vec!["https://example.com/gallery"]);
        assert!(node.child_sitemaps.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml_is_error() {
        let xml = "<urlset><url><loc>https://example.com/</wrong></url></urlset>";
        assert!(parse("https://example.com/sitemap.xml", xml).is_err());
    }

    #[test]
    fn test_parse_no_locs_is_empty_not_error() {
        let node = parse("https://example.com/sitemap.xml", "<urlset></urlset>").unwrap();
        assert!(node.page_urls.is_empty());
        assert!(node.child_sitemaps.is_empty());
    }

    #[test]
    fn test_parse_unicode_urls() {
        let xml = "<urlset><url><loc>https://example.com/caf\u{e9}/men\u{fc}</loc></url></urlset>";
        let node = parse("https://example.com/sitemap.xml", xml).unwrap();
        assert_eq!(node.page_urls, vec!["https://example.com/caf\u{e9}/men\u{fc}"]);
    }
}
