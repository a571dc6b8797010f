// src/crawl/mod.rs
// =============================================================================
// This module handles bounded website crawling.
//
// Features:
// - Breadth-first visiting starting from a seed URL
// - Respects same-origin restriction (never leaves the seed's host, or the
//   host the seed redirected to)
// - Hard cap on the number of pages visited
// - Only the seed page's links are followed (one level of expansion)
//
// What happens to each page is up to a PageHandler: the crawler only hands
// over the URL and the page, then records whether the handler succeeded.
// =============================================================================

mod handler;
mod queue;

pub use handler::{CrawlRecord, PageHandler, RecordStatus};
pub use queue::{BoundedCrawler, CrawlOutcome, DEFAULT_MAX_PAGES};
