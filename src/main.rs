// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env, parse command-line arguments using clap, set up logging
// 2. Dispatch to the appropriate subcommand handler
// 3. Print the results (table or JSON)
// 4. Exit with proper code (0 = success, 1 = nothing found / pages failed,
//    2 = fatal error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;        // src/cli.rs - command-line parsing
mod collect;    // src/collect/ - paginated listing collection
mod crawl;      // src/crawl/ - bounded same-site crawl
mod error;      // src/error.rs - typed errors
mod fetch;      // src/fetch/ - page loading
mod links;      // src/links/ - link normalization and filtering
mod report;     // src/report/ - Markdown reports for crawled pages
mod telemetry;  // src/telemetry.rs - logging setup

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use cli::{Cli, Commands};
use collect::{CollectConfig, Collection, PaginatedCollector, StopReason};
use crawl::{BoundedCrawler, CrawlOutcome, RecordStatus};
use fetch::{FetchOptions, HttpFetcher};
use report::ReportWriter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = everything worked
//   Ok(1) = collection found nothing, or some crawled pages failed
//   Err   = fatal error (exit code 2)
async fn run() -> Result<i32> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let machine_output = match &cli.command {
        Commands::Collect { json, .. } | Commands::Crawl { json, .. } => *json,
    };
    telemetry::init(machine_output);

    match cli.command {
        Commands::Collect {
            listing_url,
            page_size,
            offset_param,
            selector,
            delay_ms,
            timeout_ms,
            retries,
            json,
        } => {
            let options = FetchOptions {
                timeout_ms,
                link_selector: selector,
                user_agent: cli.user_agent,
            };
            let config = CollectConfig {
                page_size,
                offset_param,
                delay: Duration::from_millis(delay_ms),
                retries,
            };
            handle_collect(&listing_url, options, config, json).await
        }
        Commands::Crawl {
            start_url,
            max_pages,
            timeout_ms,
            out_dir,
            json,
        } => {
            let options = FetchOptions {
                timeout_ms,
                user_agent: cli.user_agent,
                ..FetchOptions::default()
            };
            handle_crawl(&start_url, max_pages, options, &out_dir, json).await
        }
    }
}

// Handles the 'collect' subcommand
async fn handle_collect(
    listing_url: &str,
    options: FetchOptions,
    config: CollectConfig,
    json: bool,
) -> Result<i32> {
    info!(
        listing_url,
        page_size = config.page_size,
        timeout_ms = options.timeout_ms,
        "collecting links from listing"
    );

    let fetcher = HttpFetcher::new(options).context("could not set up the page fetcher")?;
    let collector = PaginatedCollector::new(fetcher, config);

    let collection = collector
        .collect(listing_url)
        .await
        .with_context(|| format!("collection from {} aborted", listing_url))?;

    print_collection(&collection, json)?;

    if collection.links.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(
    start_url: &str,
    max_pages: usize,
    options: FetchOptions,
    out_dir: &Path,
    json: bool,
) -> Result<i32> {
    let mut writer = ReportWriter::create(out_dir, start_url)
        .context("could not prepare the report directory")?;

    info!(
        start_url,
        max_pages,
        timeout_ms = options.timeout_ms,
        run_dir = %writer.run_dir().display(),
        "starting crawl"
    );

    let fetcher = HttpFetcher::new(options).context("could not set up the page fetcher")?;
    let crawler = BoundedCrawler::new(fetcher, max_pages);

    let outcome = crawler
        .crawl(start_url, &mut writer)
        .await
        .with_context(|| format!("crawl of {} aborted", start_url))?;

    print_crawl(&outcome, &writer, json)?;

    if outcome.failures() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// JSON shape for a collection, with links sorted so output is stable
#[derive(Serialize)]
struct CollectionOutput<'a> {
    links: Vec<&'a str>,
    pages: usize,
    stopped: &'a StopReason,
}

fn sorted_links(collection: &Collection) -> Vec<&str> {
    let mut links: Vec<&str> = collection.links.iter().map(String::as_str).collect();
    links.sort_unstable();
    links
}

fn print_collection(collection: &Collection, json: bool) -> Result<()> {
    let links = sorted_links(collection);

    if json {
        let output = CollectionOutput {
            links,
            pages: collection.pages,
            stopped: &collection.stopped,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for link in &links {
        println!("{}", link);
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages: {}", collection.pages);
    println!("   🔗 Unique links: {}", links.len());
    match &collection.stopped {
        StopReason::EmptyPage { page } => println!("   🏁 Stopped: page {} was empty", page),
        StopReason::FetchFailed { page, error } => {
            println!("   ⚠️  Stopped: page {} failed ({})", page, error)
        }
    }

    Ok(())
}

fn print_crawl(outcome: &CrawlOutcome, writer: &ReportWriter, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("{:<60} {:<18} {:<30}", "URL", "STATUS", "REPORT");
    println!("{}", "=".repeat(108));

    for record in &outcome.records {
        // Truncate URL if too long for display
        let url_display = if record.url.chars().count() > 57 {
            format!("{}...", record.url.chars().take(57).collect::<String>())
        } else {
            record.url.clone()
        };
        let detail = record
            .artifact
            .as_deref()
            .or(record.message.as_deref())
            .unwrap_or("");

        println!("{:<60} {:<18} {:<30}", url_display, format_status(record.status), detail);
    }

    println!();

    let failures = outcome.failures();
    println!("📊 Summary:");
    println!("   ✅ Passed: {}", outcome.records.len() - failures);
    println!("   ❌ Failed: {}", failures);
    println!("   📋 Visited: {}", outcome.records.len());
    println!("   📝 Summary file: {}", writer.summary_path().display());

    Ok(())
}

fn format_status(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Pass => "✅ PASS",
        RecordStatus::Fail => "❌ FAIL",
        RecordStatus::FetchFailed => "⚠️  FETCH FAILED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sorted_links_are_stable() {
        let collection = Collection {
            links: ["https://b.example", "https://a.example", "https://c.example"]
                .iter()
                .map(|s| s.to_string())
                .collect::<HashSet<_>>(),
            pages: 1,
            stopped: StopReason::EmptyPage { page: 2 },
        };

        assert_eq!(
            sorted_links(&collection),
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn test_collection_json_shape() {
        let collection = Collection {
            links: HashSet::from(["https://a.example".to_string()]),
            pages: 1,
            stopped: StopReason::EmptyPage { page: 2 },
        };
        let output = CollectionOutput {
            links: sorted_links(&collection),
            pages: collection.pages,
            stopped: &collection.stopped,
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["links"][0], "https://a.example");
        assert_eq!(value["stopped"]["reason"], "empty_page");
        assert_eq!(value["stopped"]["page"], 2);
    }
}
