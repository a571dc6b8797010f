// src/fetch/mod.rs
// =============================================================================
// This module loads pages.
//
// Submodules:
// - http: the real fetcher, backed by reqwest
// - extract: pulls visible text and links out of an HTML document
//
// The collector and the crawler only ever see the PageFetcher trait, so
// tests can hand them a scripted fetcher instead of a network.
// =============================================================================

mod extract;
mod http;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::{FetchOptions, HttpFetcher, DEFAULT_USER_AGENT};

/// One successfully loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects
    pub url: String,
    /// Visible text of the page body
    pub text: String,
    /// Outbound link targets, absolute but otherwise untouched, in document order
    pub links: Vec<String>,
}

/// Loads a single page.
///
/// Implementations must not retry and must release whatever session they
/// opened before returning, on success and on failure alike.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        (**self).fetch(url).await
    }
}
