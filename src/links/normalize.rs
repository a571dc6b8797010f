// src/links/normalize.rs
// =============================================================================
// Link normalization and same-origin filtering.
//
// normalize():
// 1. Cut the fragment (everything from the first '#')
// 2. Strip trailing slashes
// 3. Reject empty strings and mailto:/tel:/javascript: links
//
// LinkFilter (used by the crawler):
// 1. Resolve relative hrefs against the start URL (or where it redirected)
// 2. Normalize
// 3. Keep only http(s) links on the start URL's host (or the redirect's)
// 4. Drop links pointing back at the start URL itself
// 5. Deduplicate, keeping first-seen order
//
// Everything here is pure - no I/O, no state between calls.
// =============================================================================

use anyhow::{anyhow, Result};
use std::collections::HashSet;
use url::Url;

// Schemes we never follow
const REJECTED_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

// Normalizes one href
//
// Returns None when the link should be dropped.
//
// Examples:
//   "https://example.com/a/"      -> Some("https://example.com/a")
//   "https://example.com/a#top"   -> Some("https://example.com/a")
//   "mailto:someone@example.com"  -> None
//   "#section"                    -> None (nothing left after the cut)
//
// normalize(normalize(x)) == normalize(x) for every x: the output never
// contains '#', never ends in '/' or whitespace, never starts with whitespace.
pub fn normalize(href: &str) -> Option<String> {
    let without_fragment = match href.find('#') {
        Some(index) => &href[..index],
        None => href,
    };

    let trimmed = without_fragment
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .trim_start();

    if trimmed.is_empty() || has_rejected_scheme(trimmed) {
        return None;
    }

    Some(trimmed.to_string())
}

fn has_rejected_scheme(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    REJECTED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Filters a page's links down to same-origin URLs worth visiting.
///
/// Starts out knowing one origin (the start URL). When the seed redirects,
/// `add_origin` teaches it the page's final address too, so links on the
/// redirected host still count as same-site.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    base: Url,
    hosts: Vec<String>,
    starts: Vec<String>,
}

impl LinkFilter {
    // Builds a filter anchored at the crawl's start URL
    //
    // Fails if the start URL does not parse or has no host - there is no
    // origin to compare against in that case.
    pub fn new(start_url: &str) -> Result<Self> {
        let base = Url::parse(start_url)
            .map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;

        let host = base
            .host_str()
            .ok_or_else(|| anyhow!("URL has no host: {}", start_url))?
            .to_string();

        let start = normalize(start_url)
            .ok_or_else(|| anyhow!("Start URL normalizes to nothing: {}", start_url))?;

        Ok(Self {
            base,
            hosts: vec![host],
            starts: vec![start],
        })
    }

    // Registers the address the seed actually ended up at
    //
    // Its host becomes same-site, the URL itself counts as "the seed" for
    // self-loop checks, and relative hrefs resolve against it from now on.
    // Unparseable or host-less URLs are ignored.
    pub fn add_origin(&mut self, final_url: &str) {
        let Ok(parsed) = Url::parse(final_url) else {
            return;
        };
        let Some(host) = parsed.host_str().map(str::to_string) else {
            return;
        };

        if !self.hosts.contains(&host) {
            self.hosts.push(host);
        }
        if let Some(start) = normalize(final_url) {
            if !self.starts.contains(&start) {
                self.starts.push(start);
            }
        }
        self.base = parsed;
    }

    // Checks a single href
    //
    // Returns the normalized absolute URL when it passes every rule.
    pub fn accept(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        // Resolve first: "/" and "../" only mean something once joined
        let absolute = resolve(&self.base, href)?;
        let normalized = normalize(&absolute)?;

        let parsed = Url::parse(&normalized).ok()?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return None;
        }
        let host = parsed.host_str()?;
        if !self.hosts.iter().any(|known| known == host) {
            return None;
        }
        if self.starts.contains(&normalized) {
            return None;
        }

        Some(normalized)
    }

    // Filters a list of hrefs, keeping the order in which they were found
    pub fn filter_links(&self, links: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();

        for link in links {
            if let Some(url) = self.accept(link) {
                if seen.insert(url.clone()) {
                    accepted.push(url);
                }
            }
        }

        accepted
    }
}

// Resolves a possibly-relative URL to an absolute URL
//
// Absolute links are returned as written: re-serializing them through Url
// would add a trailing '/' to bare hosts and undo normalization.
fn resolve(base: &Url, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(_) => Some(href.to_string()),
        Err(_) => base.join(href).ok().map(|url| url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_fragment_and_trailing_slash() {
        assert_eq!(
            normalize("https://example.com/a/#top"),
            Some("https://example.com/a".to_string())
        );
        assert_eq!(normalize("https://example.com/"), normalize("https://example.com"));
        assert_eq!(normalize("https://example.com/a#x"), normalize("https://example.com/a"));
    }

    #[test]
    fn test_normalize_rejects_special_schemes() {
        assert_eq!(normalize("mailto:x"), None);
        assert_eq!(normalize("tel:x"), None);
        assert_eq!(normalize("javascript:x"), None);
        assert_eq!(normalize("JavaScript:void(0)"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("#only-a-fragment"), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "https://example.com",
            "https://example.com/",
            "https://example.com//",
            "https://example.com/a/b/#c",
            "  https://example.com/a /",
            "/relative/path/",
            "https://example.com/?q=1#frag",
            "https://example.com/#/route/",
        ];

        for sample in samples {
            let once = normalize(sample);
            let twice = once.as_deref().and_then(normalize);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_filter_rejects_other_hosts_and_self() {
        let filter = LinkFilter::new("https://example.com").unwrap();

        assert_eq!(filter.accept("https://other.com/b"), None);
        assert_eq!(filter.accept("https://example.com/"), None);
        assert_eq!(filter.accept("https://example.com#top"), None);
        assert_eq!(
            filter.accept("https://example.com/a"),
            Some("https://example.com/a".to_string())
        );
    }

    #[test]
    fn test_filter_resolves_relative_links() {
        let filter = LinkFilter::new("https://example.com/docs/").unwrap();
        assert_eq!(
            filter.accept("guide/"),
            Some("https://example.com/docs/guide".to_string())
        );
        assert_eq!(
            filter.accept("/about"),
            Some("https://example.com/about".to_string())
        );
    }

    #[test]
    fn test_filter_links_dedups_in_discovery_order() {
        let filter = LinkFilter::new("https://example.com").unwrap();
        let links = vec![
            "https://example.com/a".to_string(),
            "https://example.com/a#x".to_string(),
            "https://other.com/b".to_string(),
            "mailto:c@example.com".to_string(),
            "https://example.com/b/".to_string(),
            "https://example.com/a/".to_string(),
        ];

        assert_eq!(
            filter.filter_links(&links),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_filter_resolves_root_and_parent_hrefs() {
        let filter = LinkFilter::new("https://example.com/docs/guide/").unwrap();
        assert_eq!(filter.accept("/"), Some("https://example.com".to_string()));
        assert_eq!(filter.accept("../"), Some("https://example.com/docs".to_string()));
        assert_eq!(filter.accept("#top"), None);
        assert_eq!(filter.accept("   "), None);
    }

    #[test]
    fn test_filter_accepts_redirected_origin() {
        let mut filter = LinkFilter::new("https://example.com").unwrap();
        assert_eq!(filter.accept("https://www.example.com/a"), None);

        filter.add_origin("https://www.example.com/home");

        assert_eq!(
            filter.accept("https://www.example.com/a"),
            Some("https://www.example.com/a".to_string())
        );
        assert_eq!(
            filter.accept("https://example.com/b"),
            Some("https://example.com/b".to_string())
        );
        // Both the start URL and where it landed count as the seed
        assert_eq!(filter.accept("https://www.example.com/home/"), None);
        assert_eq!(filter.accept("https://example.com"), None);
        // Relative links now resolve against the final address
        assert_eq!(
            filter.accept("about"),
            Some("https://www.example.com/about".to_string())
        );
        assert_eq!(filter.accept("https://other.com/x"), None);
    }

    #[test]
    fn test_filter_rejects_non_http_schemes() {
        let filter = LinkFilter::new("https://example.com").unwrap();
        assert_eq!(filter.accept("ftp://example.com/file"), None);
    }

    #[test]
    fn test_filter_needs_a_host() {
        assert!(LinkFilter::new("not a url").is_err());
    }
}
