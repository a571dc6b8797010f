// src/report/mod.rs
// =============================================================================
// This module writes crawl results to disk as Markdown.
//
// Layout of one run:
//   <out_dir>/<YYYYmmdd_HHMMSS>_<domain>/
//       report_<page-slug>.md   one per page that loaded
//       summary.md              table of every visited URL and its status
// =============================================================================

mod markdown;

pub use markdown::ReportWriter;
