// src/report/markdown.rs
// =============================================================================
// ReportWriter: the default PageHandler.
//
// For every page the crawler hands over it writes a small Markdown report
// (URL, time, a text excerpt, the links found). When the crawl is done it
// writes summary.md, a table with one row per visited URL.
//
// Files already written stay on disk even if the run later aborts.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use crate::crawl::{CrawlRecord, PageHandler, RecordStatus};
use crate::error::ReportError;
use crate::fetch::Page;

// Longest text excerpt kept in a page report, in characters
const EXCERPT_CHARS: usize = 10_000;

// Turns a host into something safe for a directory name
//
// "www.example.com" -> "www_example_com"
pub fn domain_slug(start_url: &str) -> Result<String, ReportError> {
    let host = Url::parse(start_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| ReportError::NoHost(start_url.to_string()))?;

    Ok(host.replace('.', "_"))
}

// Turns a page URL into a file-name stem
//
// "https://example.com/docs/intro/" -> "example_com_docs_intro"
pub fn page_slug(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    without_scheme
        .trim_end_matches('/')
        .chars()
        .map(|c| match c {
            '/' | '.' | ':' => '_',
            // Keep file names portable
            '?' | '&' | '=' | '*' | '"' | '<' | '>' | '|' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// Writes one Markdown report per page plus a run summary.
#[derive(Debug)]
pub struct ReportWriter {
    run_dir: PathBuf,
}

impl ReportWriter {
    // Creates <out_dir>/<timestamp>_<domain>/ for this run
    pub fn create(out_dir: &Path, start_url: &str) -> Result<Self, ReportError> {
        let run_id = format!(
            "{}_{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            domain_slug(start_url)?
        );
        Self::in_dir(out_dir.join(run_id))
    }

    // Uses an exact directory, creating it if needed
    pub fn in_dir(run_dir: PathBuf) -> Result<Self, ReportError> {
        std::fs::create_dir_all(&run_dir).map_err(|source| ReportError::CreateDir {
            path: run_dir.clone(),
            source,
        })?;

        Ok(Self { run_dir })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn summary_path(&self) -> PathBuf {
        self.run_dir.join("summary.md")
    }

    fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf, ReportError> {
        let path = self.run_dir.join(file_name);
        std::fs::write(&path, contents).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn status_label(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Pass => "✅ PASS",
        RecordStatus::Fail => "❌ FAIL",
        RecordStatus::FetchFailed => "⚠️ FETCH FAILED",
    }
}

fn render_page_report(url: &str, page: &Page, status: RecordStatus) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let excerpt: String = page.text.chars().take(EXCERPT_CHARS).collect();

    writeln!(out, "# Page Report\n")?;
    writeln!(out, "**Target URL:** {}", url)?;
    if page.url != url {
        writeln!(out, "**Final URL:** {}", page.url)?;
    }
    writeln!(out, "**Date:** {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "**Status:** {}\n", status_label(status))?;

    writeln!(out, "## 1. Page Text\n")?;
    writeln!(out, "```text\n{}\n```\n", excerpt)?;

    writeln!(out, "## 2. Links ({})\n", page.links.len())?;
    for link in &page.links {
        writeln!(out, "- {}", link)?;
    }

    Ok(out)
}

fn render_summary(start_url: &str, records: &[CrawlRecord]) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "# Crawl Summary\n")?;
    writeln!(out, "**Target:** {}", start_url)?;
    writeln!(out, "**Date:** {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "| URL | Status | Report |")?;
    writeln!(out, "| --- | --- | --- |")?;

    for record in records {
        let report = match &record.artifact {
            Some(file_name) => format!("[View Report]({})", file_name),
            None => "-".to_string(),
        };
        writeln!(out, "| {} | {} | {} |", record.url, status_label(record.status), report)?;
    }

    Ok(out)
}

#[async_trait]
impl PageHandler for ReportWriter {
    // A page that reaches the writer has loaded with text, so its report
    // is a pass. Anything that goes wrong here becomes the page's Fail.
    async fn handle_page(&mut self, url: &str, page: &Page) -> Result<String> {
        let file_name = format!("report_{}.md", page_slug(url));
        let contents = render_page_report(url, page, RecordStatus::Pass)?;
        let path = self.write_file(&file_name, &contents)?;
        info!(path = %path.display(), "wrote page report");
        Ok(file_name)
    }

    async fn finish(&mut self, start_url: &str, records: &[CrawlRecord]) -> Result<()> {
        let contents = render_summary(start_url, records)?;
        let path = self.write_file("summary.md", &contents)?;
        info!(path = %path.display(), pages = records.len(), "wrote crawl summary");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_page(url: &str) -> Page {
        Page {
            url: url.to_string(),
            text: "Hello from the page".to_string(),
            links: vec!["https://example.com/a".to_string()],
        }
    }

    #[test]
    fn test_page_slug_flattens_url() {
        assert_eq!(page_slug("https://example.com"), "example_com");
        assert_eq!(page_slug("https://example.com/docs/intro/"), "example_com_docs_intro");
        assert_eq!(page_slug("http://localhost:8080/a"), "localhost_8080_a");
    }

    #[test]
    fn test_domain_slug_uses_host() {
        assert_eq!(domain_slug("https://www.example.com/x").unwrap(), "www_example_com");
        assert!(domain_slug("not a url").is_err());
    }

    #[test]
    fn test_create_names_run_dir_after_domain() {
        let tmp = TempDir::new().unwrap();
        let writer = ReportWriter::create(tmp.path(), "https://example.com").unwrap();

        let name = writer.run_dir().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_example_com"), "unexpected run dir {}", name);
        assert!(writer.run_dir().is_dir());
    }

    #[tokio::test]
    async fn test_writes_page_report_and_summary() {
        let tmp = TempDir::new().unwrap();
        let mut writer = ReportWriter::in_dir(tmp.path().join("run")).unwrap();

        let artifact = writer
            .handle_page("https://example.com/docs", &sample_page("https://example.com/docs"))
            .await
            .unwrap();
        assert_eq!(artifact, "report_example_com_docs.md");

        let report = std::fs::read_to_string(writer.run_dir().join("report_example_com_docs.md")).unwrap();
        assert!(report.contains("**Target URL:** https://example.com/docs"));
        assert!(report.contains("Hello from the page"));
        assert!(report.contains("- https://example.com/a"));
        assert!(report.contains("**Status:** ✅ PASS"));
        assert!(!report.contains("**Final URL:**"));

        let records = vec![
            CrawlRecord {
                url: "https://example.com/docs".to_string(),
                status: RecordStatus::Pass,
                artifact: Some(artifact.clone()),
                message: None,
            },
            CrawlRecord {
                url: "https://example.com/broken".to_string(),
                status: RecordStatus::FetchFailed,
                artifact: None,
                message: Some("HTTP 500".to_string()),
            },
        ];
        writer.finish("https://example.com", &records).await.unwrap();

        let summary = std::fs::read_to_string(writer.summary_path()).unwrap();
        let rows: Vec<&str> = summary.lines().filter(|l| l.starts_with("| https://")).collect();
        assert_eq!(
            rows,
            vec![
                "| https://example.com/docs | ✅ PASS | [View Report](report_example_com_docs.md) |",
                "| https://example.com/broken | ⚠️ FETCH FAILED | - |",
            ]
        );
    }

    #[test]
    fn test_excerpt_is_capped() {
        let page = Page {
            url: "https://example.com".to_string(),
            text: "x".repeat(EXCERPT_CHARS + 500),
            links: vec![],
        };
        let report = render_page_report("https://example.com", &page, RecordStatus::Pass).unwrap();
        assert!(!report.contains(&"x".repeat(EXCERPT_CHARS + 1)));
        assert!(report.contains(&"x".repeat(EXCERPT_CHARS)));
    }

    #[test]
    fn test_page_report_status_follows_record_status() {
        let page = sample_page("https://www.example.com/home");

        let failed = render_page_report("https://example.com", &page, RecordStatus::Fail).unwrap();
        assert!(failed.contains("**Status:** ❌ FAIL"));
        assert!(!failed.contains("PASS"));
        // The seed redirected, so both addresses are shown
        assert!(failed.contains("**Target URL:** https://example.com\n"));
        assert!(failed.contains("**Final URL:** https://www.example.com/home"));

        let passed = render_page_report("https://example.com", &page, RecordStatus::Pass).unwrap();
        assert!(passed.contains("**Status:** ✅ PASS"));
    }
}
