//! # Newswire
//!
//! Collects recent articles from a news site's paginated search listing,
//! keeping only those dated inside a rolling window of calendar months.
//!
//! ## Architecture
//!
//! ```text
//! Config → search → PaginationController → ItemExtractor → RecordSink
//!                          │                      │
//!                  AutomationSurface      AssetDownloader
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Write ~/.config/newswire/config.toml
//! newswire init
//!
//! # Collect this month's and last month's articles about housing
//! newswire run --phrase housing --months 2
//!
//! # Check which months a run would cover
//! newswire window --months 3
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the
/// configuration, the image downloader and the output sink.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - Search and extract articles
/// - `window` - Print the recency window
/// - `init` - Write the default configuration
pub mod cli;

/// Configuration loaded from `~/.config/newswire/config.toml`.
pub mod config;

/// Core domain models and the pure parts of the engine.
///
/// - [`RecencyWindow`](domain::RecencyWindow): Inclusive month range
/// - [`DateParser`](domain::DateParser): Absolute and relative listing dates
/// - [`ExtractedRecord`](domain::ExtractedRecord): One output row
pub mod domain;

/// Entry point tying search and pagination together.
pub mod engine;

/// Image downloads.
///
/// - [`AssetDownloader`](fetcher::AssetDownloader): Async trait for saving images
/// - [`HttpAssetDownloader`](fetcher::http_fetcher::HttpAssetDownloader): reqwest-based implementation
pub mod fetcher;

/// Browser automation and the pagination engine.
///
/// - [`AutomationSurface`](scraper::AutomationSurface): What the engine needs from a page
/// - [`ChromeSurface`](scraper::ChromeSurface): chromiumoxide implementation
/// - [`PaginationController`](scraper::PaginationController): Page and item walk
pub mod scraper;

/// Output sinks.
///
/// - [`RecordSink`](store::RecordSink): Bulk writer trait
/// - [`XlsxSink`](store::XlsxSink): Single-sheet workbook, the default
/// - [`CsvSink`](store::CsvSink) and [`JsonSink`](store::JsonSink)
pub mod store;
