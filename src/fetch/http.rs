// src/fetch/http.rs
// =============================================================================
// This module loads pages over HTTP.
//
// Key functionality:
// - Opens a fresh session (its own reqwest::Client) for every page, so
//   cookies or pooled connections from one page never leak into the next
// - Bounds each load with a timeout
// - Turns the response into a Page (visible text + outbound links)
// - Sorts failures into FetchError variants (timeout, network, status...)
//
// There is no retry here. Whoever calls fetch() decides what a failure means.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::extract::{extract_links, extract_text};
use super::{Page, PageFetcher};
use crate::error::FetchError;

/// Desktop Chrome, the same identity the listing sites are used to seeing.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings shared by every session the fetcher opens.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// How long one page load may take, in milliseconds
    pub timeout_ms: u64,
    /// CSS selector for the elements whose href counts as a link
    pub link_selector: String,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            link_selector: "a[href]".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// The real page fetcher.
#[derive(Debug)]
pub struct HttpFetcher {
    options: FetchOptions,
    selector: Selector,
}

impl HttpFetcher {
    // Validates the options up front
    //
    // A bad link selector can never succeed on any page, so it is reported
    // the same way as a session that cannot be opened: fatal.
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let selector = Selector::parse(&options.link_selector).map_err(|e| {
            FetchError::Session(format!(
                "invalid link selector '{}': {}",
                options.link_selector, e
            ))
        })?;

        Ok(Self { options, selector })
    }

    // Opens one isolated session
    //
    // The client is dropped when fetch() returns, which closes its
    // connections whether the load worked or not.
    fn open_session(&self) -> Result<Client, FetchError> {
        Client::builder()
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .user_agent(self.options.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Session(e.to_string()))
    }

    // Parses the body into a Page
    //
    // Kept synchronous: scraper's Html is not Send, so it must never live
    // across an .await.
    fn parse_page(&self, final_url: Url, body: &str) -> Page {
        let document = Html::parse_document(body);
        let text = extract_text(&document);
        let links = extract_links(&document, &self.selector, &final_url);

        Page {
            url: final_url.to_string(),
            text,
            links,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let session = self.open_session()?;
        debug!(url, timeout_ms = self.options.timeout_ms, "opened fetch session");

        let response = session
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, self.options.timeout_ms, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.options.timeout_ms,
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let page = self.parse_page(final_url, &body);
        debug!(url, links = page.links.len(), chars = page.text.len(), "page loaded");
        Ok(page)
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - A URL reqwest refuses to send (relative, unknown scheme)
fn categorize_error(url: &str, timeout_ms: u64, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_string(),
            timeout_ms,
        };
    }

    let error_string = error.to_string();
    let message = if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "could not resolve hostname".to_string()
        } else {
            format!("connection failed: {}", error_string)
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else if error.is_builder() {
        format!("invalid request: {}", error_string)
    } else {
        error_string
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a new Client per page?
//    - Normally you build one Client and reuse it (connection pooling)
//    - Here each page gets a clean session, so one page's leftover state
//      (keep-alive sockets, redirects in flight) cannot affect the next
//    - Loads are sequential anyway, so pooling would buy little
//
// 2. Why return Result instead of an empty Page on failure?
//    - An empty page and a failed load are different things
//    - The collector stops on an empty page but may retry a failed one
//    - The crawler records both, but the log says which one happened
// -----------------------------------------------------------------------------
