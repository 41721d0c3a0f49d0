use std::fmt;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::app::{NewswireError, Result};
use crate::domain::{ExtractedRecord, RecencyWindow};
use crate::scraper::{AutomationSurface, ExtractedOutcome, ItemExtractor, SelectorConfig};

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// An item older than the window was reached; everything after it is older still.
    OutsideWindow,
    /// The last page offered no next-page affordance.
    NoMorePages,
    /// The configured page bound was reached.
    PageLimit,
    /// A run-fatal error ended extraction early.
    Fatal,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::OutsideWindow => "reached an article outside the window",
            StopReason::NoMorePages => "no more pages",
            StopReason::PageLimit => "page limit reached",
            StopReason::Fatal => "fatal error",
        })
    }
}

/// Mutable state of one run, owned by the controller.
#[derive(Debug, Default)]
pub struct EngineState {
    pub current_page_index: usize,
    pub collected: Vec<ExtractedRecord>,
    pub stopped: bool,
}

/// Everything a run produced, including the partial result of a failed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub records: Vec<ExtractedRecord>,
    pub stop: StopReason,
    pub pages_visited: usize,
    pub skipped: usize,
    pub error: Option<NewswireError>,
}

impl RunOutcome {
    /// A run that failed before any page was walked.
    pub fn failed(error: NewswireError) -> Self {
        Self {
            records: Vec::new(),
            stop: StopReason::Fatal,
            pages_visited: 0,
            skipped: 0,
            error: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Walks the listing page by page, item by item, until a stop condition.
pub struct PaginationController<'a, S: AutomationSurface> {
    surface: &'a S,
    extractor: ItemExtractor<'a, S>,
    selectors: &'a SelectorConfig,
    listing_timeout: Duration,
    max_pages: Option<usize>,
    state: EngineState,
    pages_visited: usize,
    skipped: usize,
}

impl<'a, S: AutomationSurface> PaginationController<'a, S> {
    pub fn new(
        surface: &'a S,
        extractor: ItemExtractor<'a, S>,
        selectors: &'a SelectorConfig,
        listing_timeout: Duration,
    ) -> Self {
        Self {
            surface,
            extractor,
            selectors,
            listing_timeout,
            max_pages: None,
            state: EngineState::default(),
            pages_visited: 0,
            skipped: 0,
        }
    }

    /// Stop after `max_pages` pages; `None` follows pagination to the end.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Extract every in-window item, newest first, across pages.
    pub async fn run(mut self, window: &RecencyWindow, search_phrase: &str) -> RunOutcome {
        let (stop, error) = match self.walk(window, search_phrase).await {
            Ok(stop) => (stop, None),
            Err(e) => {
                error!(
                    "Stopping on page {} after {} records: {}",
                    self.state.current_page_index + 1,
                    self.state.collected.len(),
                    e
                );
                (StopReason::Fatal, Some(e))
            }
        };
        self.state.stopped = true;

        info!(
            "Collected {} records from {} pages ({} skipped): {}",
            self.state.collected.len(),
            self.pages_visited,
            self.skipped,
            stop
        );

        RunOutcome {
            records: self.state.collected,
            stop,
            pages_visited: self.pages_visited,
            skipped: self.skipped,
            error,
        }
    }

    async fn walk(&mut self, window: &RecencyWindow, search_phrase: &str) -> Result<StopReason> {
        loop {
            self.surface
                .wait_visible(&self.selectors.results_container, self.listing_timeout)
                .await
                .map_err(NewswireError::from_wait)?;
            self.pages_visited += 1;

            let handles = self.surface.find_all(&self.selectors.result_items).await?;
            info!(
                "Page {}: {} items",
                self.state.current_page_index + 1,
                handles.len()
            );

            for (index, handle) in handles.into_iter().enumerate() {
                match self
                    .extractor
                    .extract(handle, index, window, search_phrase)
                    .await?
                {
                    ExtractedOutcome::Record(record) => {
                        debug!("Kept {:?} ({})", record.title, record.date_text);
                        self.state.collected.push(record);
                    }
                    ExtractedOutcome::Skipped(reason) => {
                        warn!(
                            "Skipped item {} on page {}: {}",
                            index + 1,
                            self.state.current_page_index + 1,
                            reason
                        );
                        self.skipped += 1;
                    }
                    ExtractedOutcome::OutOfWindow { date_text } => {
                        info!("Item dated {:?} is outside the window", date_text);
                        return Ok(StopReason::OutsideWindow);
                    }
                }
            }

            if self.max_pages.is_some_and(|max| self.pages_visited >= max) {
                return Ok(StopReason::PageLimit);
            }

            if !self.surface.is_visible(&self.selectors.next_page).await? {
                return Ok(StopReason::NoMorePages);
            }

            self.surface
                .go_next_page(&self.selectors.next_page)
                .await
                .map_err(NewswireError::from_wait)?;
            self.state.current_page_index += 1;
        }
    }
}
