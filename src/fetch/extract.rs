// src/fetch/extract.rs
// =============================================================================
// This module extracts text and links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Text extraction walks every text node under <body> and skips anything
// inside elements a browser would not render as text (script, style, ...).
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Elements whose text content never shows up on screen
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

// Returns the visible text of a document, whitespace collapsed
//
// Falls back to the whole document when there is no <body> element.
pub fn extract_text(document: &Html) -> String {
    let root = match Selector::parse("body") {
        Ok(selector) => document.select(&selector).next(),
        Err(_) => None,
    }
    .unwrap_or_else(|| document.root_element());

    let mut words: Vec<&str> = Vec::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ")
}

// Extracts the href of every element matched by `selector`
//
// Parameters:
//   document: the parsed page
//   selector: which elements count as links (e.g. "a[href]")
//   page_url: where the page was loaded from, for resolving relative hrefs
//
// Returns: absolute URLs in document order. Duplicates and fragments are
// kept; normalization is the caller's job.
pub fn extract_links(document: &Html, selector: &Selector, page_url: &Url) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(page_url, href))
        .collect()
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "mailto:a@b.c" -> Some("mailto:a@b.c") (the normalizer drops it later)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.join(href).ok().map(|url| url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Selector {
        Selector::parse("a[href]").unwrap()
    }

    #[test]
    fn test_text_skips_scripts_and_styles() {
        let html = Html::parse_document(
            r#"<html><head><title>T</title><style>.x{}</style></head>
            <body><h1>Hello</h1>
            <script>var hidden = 1;</script>
            <p>  visible
               text </p><noscript>no js</noscript></body></html>"#,
        );
        assert_eq!(extract_text(&html), "Hello visible text");
    }

    #[test]
    fn test_text_of_empty_body_is_empty() {
        let html = Html::parse_document("<html><body>   </body></html>");
        assert_eq!(extract_text(&html), "");
    }

    #[test]
    fn test_links_are_resolved_in_document_order() {
        let html = Html::parse_document(
            r#"<a href="https://www.rust-lang.org">Rust</a>
               <a href="/docs">Docs</a>
               <a href="../about#team">About</a>
               <a>no href</a>"#,
        );
        let base = Url::parse("https://example.com/page/").unwrap();
        assert_eq!(
            extract_links(&html, &anchors(), &base),
            vec![
                "https://www.rust-lang.org/",
                "https://example.com/docs",
                "https://example.com/about#team",
            ]
        );
    }

    #[test]
    fn test_links_honour_custom_selector() {
        let html = Html::parse_document(
            r#"<a class="item" href="/item/1">1</a>
               <a class="nav" href="/next">next</a>
               <a class="item" href="/item/2">2</a>"#,
        );
        let base = Url::parse("https://shop.example.com/search").unwrap();
        let selector = Selector::parse("a.item").unwrap();
        assert_eq!(
            extract_links(&html, &selector, &base),
            vec![
                "https://shop.example.com/item/1",
                "https://shop.example.com/item/2",
            ]
        );
    }
}
