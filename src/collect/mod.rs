// src/collect/mod.rs
// =============================================================================
// This module collects every item link from a paginated listing.
//
// A listing is a search-results feed reached through an offset parameter:
//   page 1 -> ?...&b=1, page 2 -> ?...&b=31, page 3 -> ?...&b=61, ...
// We keep asking for the next page until one comes back with no links.
// =============================================================================

mod paginate;

pub use paginate::{CollectConfig, Collection, PaginatedCollector, StopReason};
