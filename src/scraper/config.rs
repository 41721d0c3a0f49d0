use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Chrome session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Bound on every wait for a page-level element, in seconds (default: 15)
    pub listing_timeout_secs: u64,

    /// How often a pending wait re-checks visibility, in milliseconds (default: 250)
    pub poll_interval_ms: u64,

    /// Settle time after a navigation for dynamic content in milliseconds (default: 1000)
    pub wait_after_load_ms: u64,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            listing_timeout_secs: 15,
            poll_interval_ms: 250,
            wait_after_load_ms: 1000,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl BrowserConfig {
    /// Get the listing wait bound as a Duration
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }
}

/// Locators for the listing site.
///
/// Values starting with `/` or `(` are XPath expressions, anything else is
/// a CSS selector. Item field locators are resolved relative to one listing
/// item and must be CSS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub search_button: String,
    pub search_input: String,
    pub results_container: String,
    pub result_items: String,
    /// Category filter checkbox; `{category}` is replaced with the configured category
    pub category_checkbox: String,
    pub sort_select: String,
    /// Option value of `sort_select` that orders results newest first
    pub sort_newest_value: String,
    pub next_page: String,

    pub title: String,
    pub date: String,
    pub summary: String,
    pub image: String,
    pub image_attribute: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            search_button: "button[data-element='search-button']".to_string(),
            search_input: "input[data-element='search-form-input']".to_string(),
            results_container: "ul.search-results-module-results-menu".to_string(),
            result_items: "ul.search-results-module-results-menu > li".to_string(),
            category_checkbox: "//div[contains(@class, 'search-filter-input')]\
                                //label/span[text()='{category}']\
                                /preceding::input[@type='checkbox'][1]"
                .to_string(),
            sort_select: "select.select-input".to_string(),
            sort_newest_value: "1".to_string(),
            next_page: "div.search-results-module-next-page a".to_string(),
            title: "h3.promo-title a".to_string(),
            date: "p.promo-timestamp".to_string(),
            summary: "p.promo-description".to_string(),
            image: "picture img.image".to_string(),
            image_attribute: "src".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Category checkbox locator for `category`
    pub fn category_checkbox_for(&self, category: &str) -> String {
        self.category_checkbox.replace("{category}", category)
    }
}

/// Whether a locator is an XPath expression rather than a CSS selector.
pub(crate) fn is_xpath(locator: &str) -> bool {
    let trimmed = locator.trim_start();
    trimmed.starts_with('/') || trimmed.starts_with('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_browser_values() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.listing_timeout(), Duration::from_secs(15));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.wait_after_load(), Duration::from_millis(1000));
        assert!(config.user_agent.is_some());
    }

    #[test]
    fn test_poll_interval_has_floor() {
        let config = BrowserConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_category_checkbox_substitution() {
        let selectors = SelectorConfig::default();
        let locator = selectors.category_checkbox_for("World & Nation");
        assert!(locator.contains("text()='World & Nation'"));
        assert!(!locator.contains("{category}"));
    }

    #[test]
    fn test_locator_kind() {
        let selectors = SelectorConfig::default();
        assert!(is_xpath(&selectors.category_checkbox));
        assert!(is_xpath("(//li)[1]"));
        assert!(!is_xpath(&selectors.result_items));
        assert!(!is_xpath("h3.promo-title a"));
    }
}
