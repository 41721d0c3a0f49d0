//! One extraction run: validate, resolve the window, search, paginate.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::app::Result;
use crate::config::Config;
use crate::domain::RecencyWindow;
use crate::fetcher::AssetDownloader;
use crate::scraper::{search, AutomationSurface, ItemExtractor, PaginationController, RunOutcome};

/// Run the whole pipeline against `surface`.
///
/// `Err` means the configuration was rejected and nothing was attempted.
/// Every other failure is reported in [`RunOutcome::error`] next to the
/// records collected before it.
pub async fn run<S: AutomationSurface>(
    surface: &S,
    downloader: &dyn AssetDownloader,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<RunOutcome> {
    config.validate()?;
    let window = RecencyWindow::resolve(now, config.search.months_back)?;
    info!(
        "Collecting articles from {}-{:02} through {}",
        window.earliest_year,
        window.earliest_month,
        window.latest.format("%Y-%m-%d %H:%M UTC")
    );

    let timeout = config.browser.listing_timeout();
    if let Err(e) = search::open_results(surface, &config.search, &config.selectors, timeout).await
    {
        error!("Search failed: {}", e);
        return Ok(RunOutcome::failed(e));
    }

    let extractor = ItemExtractor::new(surface, &config.selectors, downloader);
    let outcome = PaginationController::new(surface, extractor, &config.selectors, timeout)
        .with_max_pages(config.search.max_pages)
        .run(&window, config.search.search_phrase.trim())
        .await;

    Ok(outcome)
}
