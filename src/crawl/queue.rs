// src/crawl/queue.rs
// =============================================================================
// This module implements the bounded crawl with a breadth-first queue.
//
// How it works:
// 1. Start with the seed URL in a queue
// 2. Take the next URL, skip it if we've already been there
// 3. Fetch the page
// 4. If it's the very first page, filter its links (same host, not the seed,
//    not seen yet) and put them at the back of the queue. The host and URL
//    the seed finally landed on (after redirects) count as the seed's too
// 5. Hand the page to the PageHandler and record whether it succeeded
// 6. Repeat until the queue is empty or max_pages pages have been visited
//
// Only the seed's links ever join the queue. Links found on later pages are
// ignored, so the crawl is "seed + its direct links, in the order found".
//
// Failed pages still count towards max_pages.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{info, warn};

use super::handler::{CrawlRecord, PageHandler, RecordStatus};
use crate::fetch::{Page, PageFetcher};
use crate::links::LinkFilter;

/// Seed page plus five of its links.
pub const DEFAULT_MAX_PAGES: usize = 6;

/// What a crawl did, in visiting order.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub start_url: String,
    pub records: Vec<CrawlRecord>,
}

impl CrawlOutcome {
    pub fn failures(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.status.is_pass())
            .count()
    }
}

/// Visits at most `max_pages` pages reachable in one hop from a seed.
pub struct BoundedCrawler<F> {
    fetcher: F,
    max_pages: usize,
}

impl<F: PageFetcher> BoundedCrawler<F> {
    pub fn new(fetcher: F, max_pages: usize) -> Self {
        Self { fetcher, max_pages }
    }

    // Runs the crawl
    //
    // Parameters:
    //   start_url: the seed page
    //   handler: gets every page that loads, then the full record list
    //
    // Returns Err for a bad start URL, a fatal fetch error, or a handler
    // that could not finish. Per-page problems are recorded, not returned.
    pub async fn crawl<H: PageHandler>(&self, start_url: &str, handler: &mut H) -> Result<CrawlOutcome> {
        let mut filter = LinkFilter::new(start_url)?;

        let mut queue = VecDeque::new();
        queue.push_back(start_url.to_string());

        let mut visited = HashSet::new();
        let mut records = Vec::new();

        while visited.len() < self.max_pages {
            let Some(url) = queue.pop_front() else {
                break;
            };

            if visited.contains(&url) {
                continue;
            }

            info!(
                url = %url,
                page = visited.len() + 1,
                max_pages = self.max_pages,
                "crawling"
            );

            let page = match self.load(&url).await? {
                Ok(page) => page,
                Err(message) => {
                    warn!(url = %url, reason = %message, "skipping page");
                    records.push(CrawlRecord {
                        url: url.clone(),
                        status: RecordStatus::FetchFailed,
                        artifact: None,
                        message: Some(message),
                    });
                    visited.insert(url);
                    continue;
                }
            };

            // Only the seed expands the frontier
            if visited.is_empty() {
                // Where the seed landed after redirects is the seed too
                filter.add_origin(&page.url);
                let found = filter.filter_links(&page.links);
                let mut added = 0;
                for link in found.iter() {
                    if !visited.contains(link) && !queue.contains(link) {
                        queue.push_back(link.clone());
                        added += 1;
                    }
                }
                info!(found = found.len(), queued = added, "expanded frontier from seed page");
            }

            let record = match handler.handle_page(&url, &page).await {
                Ok(artifact) => CrawlRecord {
                    url: url.clone(),
                    status: RecordStatus::Pass,
                    artifact: Some(artifact),
                    message: None,
                },
                Err(e) => {
                    warn!(url = %url, error = %e, "page handler failed");
                    CrawlRecord {
                        url: url.clone(),
                        status: RecordStatus::Fail,
                        artifact: None,
                        message: Some(format!("{:#}", e)),
                    }
                }
            };
            records.push(record);

            visited.insert(url);
        }

        handler
            .finish(start_url, &records)
            .await
            .context("failed to write crawl summary")?;

        info!(visited = visited.len(), "crawl finished");

        Ok(CrawlOutcome {
            start_url: start_url.to_string(),
            records,
        })
    }

    // Loads one page
    //
    // Outer Result: fatal errors that end the crawl.
    // Inner Result: the page, or why this one page is unusable.
    async fn load(&self, url: &str) -> Result<Result<Page, String>> {
        match self.fetcher.fetch(url).await {
            Ok(page) if page.text.trim().is_empty() => Ok(Err("page has no text".to_string())),
            Ok(page) => Ok(Ok(page)),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => Ok(Err(e.to_string())),
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the "first page" check `visited.is_empty()`?
//    - The seed is always the first URL out of the queue
//    - Nothing is in `visited` until the seed has been handled
//    - If the seed fails it still lands in `visited`, so no later page can
//      ever pretend to be the seed and expand the queue
//
// 2. Why check `queue.contains`?
//    - filter_links() already removes duplicates within one page
//    - The extra check keeps the seed URL itself (still being processed)
//      and anything queued earlier from being added twice
// -----------------------------------------------------------------------------
