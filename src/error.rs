// src/error.rs
// =============================================================================
// Typed errors for the parts of the program that talk to the outside world.
//
// - FetchError: everything that can go wrong while loading one page
// - ReportError: everything that can go wrong while writing report files
//
// The application layer (main.rs) wraps these in anyhow::Error with context.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a single page could not be loaded.
///
/// Every variant except `Session` is a per-page problem: the caller logs it
/// and moves on. `Session` means we could not even open a session to load
/// pages with, so the whole run has to stop.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {timeout_ms}ms loading {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("network error loading {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("could not read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("could not open a fetch session: {0}")]
    Session(String),
}

impl FetchError {
    /// True when the run cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Session(_))
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not create report directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("start URL has no host: {0}")]
    NoHost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_session_errors_are_fatal() {
        let timeout = FetchError::Timeout {
            url: "https://example.com".to_string(),
            timeout_ms: 30_000,
        };
        assert!(!timeout.is_fatal());

        let status = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        };
        assert!(!status.is_fatal());

        assert!(FetchError::Session("no client".to_string()).is_fatal());
    }

    #[test]
    fn test_timeout_message_mentions_url_and_timeout() {
        let err = FetchError::Timeout {
            url: "https://example.com/slow".to_string(),
            timeout_ms: 1500,
        };
        let message = err.to_string();
        assert!(message.contains("https://example.com/slow"));
        assert!(message.contains("1500ms"));
    }
}
