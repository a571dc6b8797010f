// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// A few flags can also come from the environment (or a .env file), which
// main.rs loads before parsing.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::crawl::DEFAULT_MAX_PAGES;
use crate::fetch::DEFAULT_USER_AGENT;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "link-harvester",
    version = "0.1.0",
    about = "Collect links from paginated listings and run bounded same-site crawls",
    long_about = "link-harvester walks an offset-paginated search listing until it runs dry and \
                  prints every item link it found, or visits a seed page plus the same-site pages \
                  it links to and writes a Markdown report for each one."
)]
pub struct Cli {
    /// User-Agent header sent with every page request
    #[arg(long, global = true, env = "HARVESTER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (collect, crawl)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect every item link from a paginated listing
    ///
    /// Example: link-harvester collect "https://shop.example.com/search?p=kids" --selector "a.item-title"
    Collect {
        /// Listing URL without the offset parameter
        listing_url: String,

        /// Items per listing page
        #[arg(long, default_value_t = 30)]
        page_size: usize,

        /// Query parameter carrying the 1-based item offset
        #[arg(long, default_value = "b")]
        offset_param: String,

        /// CSS selector for the item links on a listing page (required)
        ///
        /// It must match only result items. Navigation links appear on every
        /// page, including the empty one past the end, so a selector that
        /// catches them never sees an empty page and never stops.
        #[arg(long)]
        selector: String,

        /// Pause between page requests, in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,

        /// Page load timeout, in milliseconds
        #[arg(long, env = "HARVESTER_TIMEOUT_MS", default_value_t = 60_000)]
        timeout_ms: u64,

        /// Retries for a listing page that fails to load
        ///
        /// With 0 (the default) a failed page ends collection just like an
        /// empty one does.
        #[arg(long, default_value_t = 0)]
        retries: u32,

        /// Output results in JSON format instead of one link per line
        #[arg(long)]
        json: bool,
    },

    /// Visit a seed page and the same-site pages it links to
    ///
    /// Example: link-harvester crawl https://example.com --max-pages 6
    Crawl {
        /// Seed URL
        start_url: String,

        /// Maximum number of pages to visit, seed included
        ///
        /// Only the seed page's links are followed, so this is "seed + the
        /// first N-1 same-site links it contains".
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: usize,

        /// Page load timeout, in milliseconds
        #[arg(long, env = "HARVESTER_TIMEOUT_MS", default_value_t = 30_000)]
        timeout_ms: u64,

        /// Directory that receives one sub-directory of reports per run
        #[arg(long, env = "HARVESTER_OUT_DIR", default_value = "reports")]
        out_dir: PathBuf,

        /// Output the crawl records in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}
