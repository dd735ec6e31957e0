//! # feed-digest
//!
//! Incrementally archives an RSS feed and renders the archive into weekly
//! Markdown digests plus a rolling summary.
//!
//! ## Architecture
//!
//! Every run is a straight pipeline, each step awaited in turn:
//!
//! ```text
//! Fetcher → Normalizer → Store (merge) → Digest
//! ```
//!
//! - [`fetcher`]: bounded-time, bounded-size HTTP retrieval
//! - [`normalizer`]: RSS parsing, link filtering and date normalization
//! - [`store`]: JSON archive with deduplication and atomic writes
//! - [`digest`]: ISO-week bucketing and document rendering
//!
//! Documents are a pure function of the archive contents, so they are
//! regenerated on every run whether or not the archive changed.
//!
//! ## Quick Start
//!
//! ```bash
//! # Fetch, merge and render
//! RSS_URL=https://example.com/rss feed-digest
//!
//! # Only regenerate documents
//! feed-digest render --week-offset 0
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// normalizer, store and digest writer.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - Update the archive and render documents (default)
/// - `update` - Fetch and merge only
/// - `render` - Render documents only
/// - `config` - Print the default configuration
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/feed-digest/config.toml` or `--config`, with
/// command-line and environment overrides.
pub mod config;

/// Weekly digest generation.
///
/// - [`generate`](digest::generate): Archive to rendered documents
/// - [`TemplateRenderer`](digest::TemplateRenderer): Handlebars rendering
/// - [`DigestWriter`](digest::DigestWriter): Document file layout
pub mod digest;

/// Core domain models.
///
/// - [`Entry`](domain::Entry): One normalized feed item
/// - [`Archive`](domain::Archive): Deduplicated, sorted item collection
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 2.0 channels into [`Entry`](domain::Entry) values.
pub mod normalizer;

/// Archive persistence.
///
/// - [`Store`](store::Store): Trait defining load/save
/// - [`JsonStore`](store::JsonStore): JSON file implementation
pub mod store;
