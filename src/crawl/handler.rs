// src/crawl/handler.rs
// =============================================================================
// The crawler's collaborators and the records it keeps about each visit.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::fetch::Page;

/// What happened to one visited page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// The handler processed the page
    Pass,
    /// The handler returned an error for the page
    Fail,
    /// The page could not be loaded, or loaded with no text
    FetchFailed,
}

impl RecordStatus {
    pub fn is_pass(self) -> bool {
        self == RecordStatus::Pass
    }
}

/// One line of the crawl summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlRecord {
    pub url: String,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Receives every successfully visited page, then the full list of records.
///
/// `handle_page` is called once per page that loaded with text, in visiting
/// order, and returns the name of whatever it produced for that page. An
/// error marks the page as failed without stopping the crawl. `finish` is
/// called exactly once after the crawl, even when every page failed.
#[async_trait]
pub trait PageHandler: Send {
    async fn handle_page(&mut self, url: &str, page: &Page) -> Result<String>;

    async fn finish(&mut self, start_url: &str, records: &[CrawlRecord]) -> Result<()>;
}
