//! Drives the site from its landing page to a newest-first result listing.

use std::time::Duration;

use tracing::info;

use crate::app::{NewswireError, Result};
use crate::config::SearchConfig;
use crate::scraper::{AutomationSurface, SelectorConfig};

/// Search for the configured phrase, apply the category filter and sort by newest.
pub async fn open_results<S: AutomationSurface>(
    surface: &S,
    search: &SearchConfig,
    selectors: &SelectorConfig,
    timeout: Duration,
) -> Result<()> {
    info!("Opening {}", search.start_url);
    surface
        .navigate(&search.start_url)
        .await
        .map_err(NewswireError::from_wait)?;

    wait(surface, &selectors.search_button, timeout).await?;
    surface.click(&selectors.search_button).await?;

    wait(surface, &selectors.search_input, timeout).await?;
    info!("Searching for {:?}", search.search_phrase);
    surface
        .submit_text(&selectors.search_input, &search.search_phrase)
        .await?;
    wait(surface, &selectors.results_container, timeout).await?;

    if let Some(category) = search.category() {
        info!("Filtering by category {:?}", category);
        let checkbox = selectors.category_checkbox_for(category);
        wait(surface, &checkbox, timeout).await?;
        surface.click(&checkbox).await?;
        wait(surface, &selectors.results_container, timeout).await?;
    }

    wait(surface, &selectors.sort_select, timeout).await?;
    surface
        .select_option(&selectors.sort_select, &selectors.sort_newest_value)
        .await?;
    wait(surface, &selectors.results_container, timeout).await?;

    info!("Search results are ready");
    Ok(())
}

async fn wait<S: AutomationSurface>(surface: &S, locator: &str, timeout: Duration) -> Result<()> {
    surface
        .wait_visible(locator, timeout)
        .await
        .map_err(NewswireError::from_wait)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::fake::FakeSurface;

    fn search(category: Option<&str>) -> SearchConfig {
        SearchConfig {
            search_phrase: "wildfire".into(),
            category: category.map(String::from),
            start_url: "https://news.example.com/".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_without_category() {
        let selectors = SelectorConfig::default();
        let surface = FakeSurface::new(Vec::new());
        open_results(&surface, &search(None), &selectors, Duration::from_secs(1))
            .await
            .unwrap();

        let calls = surface.calls();
        assert_eq!(calls[0], "navigate https://news.example.com/");
        assert!(calls.contains(&format!("click {}", selectors.search_button)));
        assert!(calls.contains(&format!("submit {} wildfire", selectors.search_input)));
        assert!(calls.contains(&format!("select {} 1", selectors.sort_select)));
        assert!(!calls.iter().any(|c| c.contains("search-filter-input")));
        assert_eq!(calls.last().unwrap(), &format!("wait {}", selectors.results_container));
    }

    #[tokio::test]
    async fn test_search_with_category_clicks_checkbox() {
        let selectors = SelectorConfig::default();
        let surface = FakeSurface::new(Vec::new());
        open_results(
            &surface,
            &search(Some("California")),
            &selectors,
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        let checkbox = selectors.category_checkbox_for("California");
        let calls = surface.calls();
        let click = calls
            .iter()
            .position(|c| *c == format!("click {}", checkbox))
            .expect("category checkbox clicked");
        let sort = calls
            .iter()
            .position(|c| c.starts_with("select "))
            .unwrap();
        assert!(click < sort);
    }

    #[tokio::test]
    async fn test_blank_category_is_ignored() {
        let selectors = SelectorConfig::default();
        let surface = FakeSurface::new(Vec::new());
        open_results(&surface, &search(Some("  ")), &selectors, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!surface.calls().iter().any(|c| c.contains("search-filter-input")));
    }

    #[tokio::test]
    async fn test_missing_category_times_out() {
        let selectors = SelectorConfig::default();
        let checkbox = selectors.category_checkbox_for("Nope");
        let surface = FakeSurface::new(Vec::new()).with_hidden(&checkbox);
        let err = open_results(&surface, &search(Some("Nope")), &selectors, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NewswireError::ListingTimeout { ref locator, waited_secs: 2 } if *locator == checkbox
        ));
    }

    #[tokio::test]
    async fn test_hidden_search_button_times_out() {
        let selectors = SelectorConfig::default();
        let surface = FakeSurface::new(Vec::new()).with_hidden(&selectors.search_button);
        let err = open_results(&surface, &search(None), &selectors, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NewswireError::ListingTimeout { .. }));
        assert!(!surface.calls().iter().any(|c| c.starts_with("submit ")));
    }
}
