// src/links/mod.rs
// =============================================================================
// This module turns raw href values into clean, comparable URLs.
//
// Submodules:
// - normalize: the pure normalizer plus the same-origin filter used by the
//   crawler
//
// The paginated collector does not use the origin filter: it reads one
// listing on one host, so every link it sees is already "ours".
// =============================================================================

mod normalize;

pub use normalize::LinkFilter;
