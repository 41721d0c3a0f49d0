use tracing::{debug, warn};

use crate::app::{NewswireError, Result};
use crate::domain::{
    DateParser, ExtractedRecord, RawArticle, RecencyWindow, SkipReason, ASSET_PLACEHOLDER,
    SUMMARY_PLACEHOLDER,
};
use crate::fetcher::AssetDownloader;
use crate::scraper::{AutomationSurface, SelectorConfig, SurfaceError, SurfaceResult};

/// Total extraction attempts per item when its handle keeps going stale.
pub const MAX_ATTEMPTS: u32 = 3;

/// What one listing item contributes to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedOutcome {
    Record(ExtractedRecord),
    /// The item's date falls outside the recency window.
    OutOfWindow { date_text: String },
    Skipped(SkipReason),
}

/// Result of reading one item through a handle that stayed valid.
enum Verdict {
    Keep(RawArticle),
    OutOfWindow(String),
    Skip(SkipReason),
}

/// Why a read attempt was abandoned.
enum Interrupted {
    Stale,
    Fatal(NewswireError),
}

/// Reads listing items into records, re-acquiring handles that go stale.
pub struct ItemExtractor<'a, S: AutomationSurface> {
    surface: &'a S,
    selectors: &'a SelectorConfig,
    downloader: &'a dyn AssetDownloader,
    parser: DateParser,
}

impl<'a, S: AutomationSurface> ItemExtractor<'a, S> {
    pub fn new(
        surface: &'a S,
        selectors: &'a SelectorConfig,
        downloader: &'a dyn AssetDownloader,
    ) -> Self {
        Self {
            surface,
            selectors,
            downloader,
            parser: DateParser::new(),
        }
    }

    /// Extract the item at `index` on the current page, starting from `handle`.
    ///
    /// Returns `Err` for an unrecognized date, which invalidates every later
    /// recency decision on the page, and for a browser failure while reading.
    pub async fn extract(
        &self,
        handle: S::Handle,
        index: usize,
        window: &RecencyWindow,
        search_phrase: &str,
    ) -> Result<ExtractedOutcome> {
        let mut initial = Some(handle);

        for attempt in 1..=MAX_ATTEMPTS {
            let handle = match initial.take() {
                Some(handle) => handle,
                None => match self.reacquire(index).await {
                    Some(handle) => handle,
                    None => {
                        debug!(
                            "Item {} not re-acquired (attempt {}/{})",
                            index, attempt, MAX_ATTEMPTS
                        );
                        continue;
                    }
                },
            };

            match self.read(&handle, window).await {
                Ok(Verdict::Keep(raw)) => {
                    return Ok(ExtractedOutcome::Record(self.finish(raw, search_phrase).await))
                }
                Ok(Verdict::OutOfWindow(date_text)) => {
                    return Ok(ExtractedOutcome::OutOfWindow { date_text })
                }
                Ok(Verdict::Skip(reason)) => return Ok(ExtractedOutcome::Skipped(reason)),
                Err(Interrupted::Fatal(e)) => return Err(e),
                Err(Interrupted::Stale) => {
                    debug!(
                        "Item {} went stale (attempt {}/{})",
                        index, attempt, MAX_ATTEMPTS
                    );
                }
            }
        }

        Ok(ExtractedOutcome::Skipped(SkipReason::StaleRetryExhausted))
    }

    async fn reacquire(&self, index: usize) -> Option<S::Handle> {
        match self.surface.find_all(&self.selectors.result_items).await {
            Ok(handles) => handles.into_iter().nth(index),
            Err(e) => {
                debug!("Re-acquiring item {} failed: {}", index, e);
                None
            }
        }
    }

    async fn read(
        &self,
        handle: &S::Handle,
        window: &RecencyWindow,
    ) -> std::result::Result<Verdict, Interrupted> {
        let surface = self.surface;
        let selectors = self.selectors;

        let Some(title) = field(
            "title",
            surface.read_field(handle, &selectors.title).await,
        )?
        else {
            return Ok(Verdict::Skip(SkipReason::UnreadableTitle));
        };

        let Some(date_text) = field("date", surface.read_field(handle, &selectors.date).await)?
        else {
            return Ok(Verdict::Skip(SkipReason::MissingDate));
        };

        let parsed = self
            .parser
            .parse(&date_text, window.latest)
            .map_err(|e| Interrupted::Fatal(e.into()))?;
        if !window.contains(parsed.instant) {
            return Ok(Verdict::OutOfWindow(date_text));
        }

        let summary_text = field(
            "summary",
            surface.read_field(handle, &selectors.summary).await,
        )?;
        let asset_url = field(
            "image",
            surface
                .read_attribute(handle, &selectors.image, &selectors.image_attribute)
                .await,
        )?;

        Ok(Verdict::Keep(RawArticle {
            title,
            date_text: Some(date_text),
            summary_text,
            asset_url,
        }))
    }

    async fn finish(&self, raw: RawArticle, search_phrase: &str) -> ExtractedRecord {
        let asset_filename = match raw.asset_url.as_deref() {
            Some(url) => match self.downloader.download(url, &raw.title).await {
                Ok(file_name) => file_name,
                Err(e) => {
                    warn!("Image download failed for {:?}: {}", raw.title, e);
                    ASSET_PLACEHOLDER.to_string()
                }
            },
            None => String::new(),
        };

        ExtractedRecord::new(
            raw.title,
            raw.date_text.unwrap_or_default(),
            raw.summary_text
                .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string()),
            asset_filename,
            search_phrase,
        )
    }
}

/// Collapse a field read: staleness interrupts the attempt, any other
/// failure or blank text counts as an absent field.
fn field(
    name: &str,
    read: SurfaceResult<Option<String>>,
) -> std::result::Result<Option<String>, Interrupted> {
    match read {
        Ok(value) => Ok(value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())),
        Err(SurfaceError::Stale) => Err(Interrupted::Stale),
        Err(e @ SurfaceError::Browser(_)) => {
            warn!("Reading {} failed: {}", name, e);
            Err(Interrupted::Fatal(e.into()))
        }
        Err(e) => {
            debug!("Reading {} failed, treating as absent: {}", name, e);
            Ok(None)
        }
    }
}
