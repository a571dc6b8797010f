// src/collect/paginate.rs
// =============================================================================
// Exhaustive collection over an offset-paginated listing.
//
// How it works:
// 1. Build the URL for page N (offset = (N - 1) * page_size + 1)
// 2. Fetch it
// 3. Links found   -> add them to the set, sleep, go to page N + 1
//    No links      -> stop, the listing is exhausted
//    Fetch failed  -> retry (if allowed), otherwise stop
//
// There is no page cap: the empty page is the only designed stop signal.
// That only works if the fetcher's link selector matches result items and
// nothing else. Site navigation shows up on the page past the end too.
// =============================================================================

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::error::FetchError;
use crate::fetch::PageFetcher;

/// Knobs for one collection run.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Items the listing shows per page
    pub page_size: usize,
    /// Query parameter that carries the 1-based item offset
    pub offset_param: String,
    /// Pause between page requests
    pub delay: Duration,
    /// How many times a failed page is retried before collection stops
    pub retries: u32,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            page_size: 30,
            offset_param: "b".to_string(),
            delay: Duration::from_secs(1),
            retries: 0,
        }
    }
}

/// Why collection ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Page `page` loaded fine but had no links
    EmptyPage { page: usize },
    /// Page `page` could not be loaded, even after retries
    FetchFailed { page: usize, error: String },
}

/// Everything a collection run found.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub links: HashSet<String>,
    /// Pages that contributed at least one link
    pub pages: usize,
    pub stopped: StopReason,
}

// What one page of the listing turned out to be
enum PageOutcome {
    Links(Vec<String>),
    Empty,
    Failed(FetchError),
}

// 1-based offset of the first item on `page_number`
//
// page_number starts at 1. With page_size 30: 1, 31, 61, ...
pub fn page_offset(page_number: usize, page_size: usize) -> usize {
    (page_number - 1) * page_size + 1
}

/// Walks a listing page by page until it runs dry.
pub struct PaginatedCollector<F> {
    fetcher: F,
    config: CollectConfig,
}

impl<F: PageFetcher> PaginatedCollector<F> {
    pub fn new(fetcher: F, config: CollectConfig) -> Self {
        Self { fetcher, config }
    }

    // Builds the URL for one page of the listing
    //
    // The offset is appended to whatever query the listing URL already has.
    pub fn page_url(&self, listing: &Url, page_number: usize) -> String {
        let offset = page_offset(page_number, self.config.page_size);
        let mut url = listing.clone();
        url.query_pairs_mut()
            .append_pair(&self.config.offset_param, &offset.to_string());
        url.to_string()
    }

    // Collects every link the listing has
    //
    // Returns Err only for fatal problems (no session could be opened, bad
    // listing URL). Those abort the run without a partial result.
    pub async fn collect(&self, listing_url: &str) -> Result<Collection> {
        if self.config.page_size == 0 {
            return Err(anyhow!("page size must be at least 1"));
        }

        let listing = Url::parse(listing_url)
            .map_err(|e| anyhow!("Invalid URL '{}': {}", listing_url, e))?;

        let mut links = HashSet::new();
        let mut page_number = 1;

        let stopped = loop {
            let url = self.page_url(&listing, page_number);
            info!(
                page = page_number,
                offset = page_offset(page_number, self.config.page_size),
                "collecting page"
            );

            match self.fetch_with_retries(&url).await? {
                PageOutcome::Links(found) => {
                    let before = links.len();
                    links.extend(found.iter().cloned());
                    info!(
                        page = page_number,
                        found = found.len(),
                        new = links.len() - before,
                        total = links.len(),
                        "page collected"
                    );

                    page_number += 1;
                    tokio::time::sleep(self.config.delay).await;
                }
                PageOutcome::Empty => {
                    info!(page = page_number, "no links on page, collection finished");
                    break StopReason::EmptyPage { page: page_number };
                }
                PageOutcome::Failed(error) => {
                    warn!(page = page_number, %url, %error, "giving up on listing");
                    break StopReason::FetchFailed {
                        page: page_number,
                        error: error.to_string(),
                    };
                }
            }
        };

        Ok(Collection {
            links,
            pages: page_number - 1,
            stopped,
        })
    }

    // Fetches one page, retrying failures up to config.retries times
    async fn fetch_with_retries(&self, url: &str) -> Result<PageOutcome> {
        let mut attempt = 0;

        loop {
            match self.fetcher.fetch(url).await {
                Ok(page) if page.links.is_empty() => return Ok(PageOutcome::Empty),
                Ok(page) => return Ok(PageOutcome::Links(page.links)),
                Err(error) if error.is_fatal() => return Err(error.into()),
                Err(error) => {
                    warn!(%url, attempt, %error, "failed to fetch listing page");
                    if attempt >= self.config.retries {
                        return Ok(PageOutcome::Failed(error));
                    }
                    attempt += 1;
                    tokio::time::sleep(self.config.delay).await;
                }
            }
        }
    }
}
