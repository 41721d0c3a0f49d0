//! Browser-driven extraction of a paginated news listing.
//!
//! # Architecture
//!
//! ```text
//! search → PaginationController → ItemExtractor → ExtractedRecord
//!                 │                      │
//!                 └──── AutomationSurface ┘
//! ```
//!
//! The controller walks the listing page by page. Every item is handed to
//! the [`ItemExtractor`], which reads its fields through an
//! [`AutomationSurface`] and decides whether the item is kept, skipped, or
//! ends the run because it is older than the recency window.
//!
//! # Usage
//!
//! ```rust,ignore
//! use newswire::scraper::{ChromeSurface, ItemExtractor, PaginationController};
//!
//! let surface = ChromeSurface::launch(&config.browser).await?;
//! let extractor = ItemExtractor::new(&surface, &config.selectors, &downloader);
//! let outcome = PaginationController::new(
//!     &surface,
//!     extractor,
//!     &config.selectors,
//!     config.browser.listing_timeout(),
//! )
//! .run(&window, "climate")
//!     .await;
//! ```

mod chrome;
mod config;
mod extractor;
mod pagination;
pub mod search;

#[cfg(test)]
pub(crate) mod fake;

pub use chrome::ChromeSurface;
pub use config::{BrowserConfig, SelectorConfig};
pub use extractor::{ExtractedOutcome, ItemExtractor, MAX_ATTEMPTS};
pub use pagination::{EngineState, PaginationController, RunOutcome, StopReason};

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single automation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The handle no longer points at a rendered element.
    #[error("Element reference is stale")]
    Stale,

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Timed out after {waited:?} waiting for {locator}")]
    Timeout { locator: String, waited: Duration },

    #[error("{0}")]
    Browser(String),
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Capabilities the engine needs from a rendered web page.
///
/// Locators are opaque strings interpreted by the implementation. Field
/// locators passed to [`read_field`](AutomationSurface::read_field) and
/// [`read_attribute`](AutomationSurface::read_attribute) are relative to
/// the item handle. Optional fields report `Ok(None)` when absent.
#[async_trait]
pub trait AutomationSurface: Send + Sync {
    /// Opaque reference to one rendered listing item.
    type Handle: Send + Sync;

    async fn navigate(&self, url: &str) -> SurfaceResult<()>;

    /// Block until `locator` is visible or `timeout` elapses.
    async fn wait_visible(&self, locator: &str, timeout: Duration) -> SurfaceResult<()>;

    /// All elements matching `locator`, in rendered order.
    async fn find_all(&self, locator: &str) -> SurfaceResult<Vec<Self::Handle>>;

    /// Text content of the first descendant of `handle` matching `field`.
    async fn read_field(&self, handle: &Self::Handle, field: &str) -> SurfaceResult<Option<String>>;

    async fn read_attribute(
        &self,
        handle: &Self::Handle,
        field: &str,
        attribute: &str,
    ) -> SurfaceResult<Option<String>>;

    async fn click(&self, locator: &str) -> SurfaceResult<()>;

    /// Type `text` into the input at `locator` and submit it with Enter.
    async fn submit_text(&self, locator: &str, text: &str) -> SurfaceResult<()>;

    /// Pick `value` in the `<select>` at `locator`.
    async fn select_option(&self, locator: &str, value: &str) -> SurfaceResult<()>;

    async fn is_visible(&self, locator: &str) -> SurfaceResult<bool>;

    /// Follow the next-page affordance at `locator`.
    async fn go_next_page(&self, locator: &str) -> SurfaceResult<()>;
}
