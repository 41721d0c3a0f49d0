//! Configuration management for newswire.
//!
//! Configuration is read from `~/.config/newswire/config.toml` unless a path
//! is given. If the file doesn't exist, a default configuration with comments
//! is created.

use crate::app::{NewswireError, Result};
use crate::scraper::{BrowserConfig, SelectorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub browser: BrowserConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// What to search for and how far back to look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub search_phrase: String,
    pub category: Option<String>,
    /// Number of calendar months to collect, including the current one
    pub months_back: i32,
    pub start_url: String,
    /// Stop after this many result pages; unbounded when absent
    pub max_pages: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_phrase: String::new(),
            category: None,
            months_back: 1,
            start_url: "https://www.latimes.com/".to_string(),
            max_pages: None,
        }
    }
}

impl SearchConfig {
    /// The category filter, if one is set to something other than whitespace.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Where results and images are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// File name without extension
    pub file_name: String,
    pub format: OutputFormat,
    /// Image directory, relative to `directory`
    pub images_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            file_name: "news_data".to_string(),
            format: OutputFormat::Xlsx,
            images_dir: PathBuf::from("images"),
        }
    }
}

impl OutputConfig {
    pub fn records_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.file_name, self.format.extension()))
    }

    pub fn images_path(&self) -> PathBuf {
        self.directory.join(&self.images_dir)
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/newswire/config.toml`
    pub fn default_config_path() -> std::result::Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newswire").join("config.toml"))
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;

        if search.search_phrase.trim().is_empty() {
            return Err(NewswireError::InvalidConfiguration(
                "search_phrase must not be empty".into(),
            ));
        }

        if search.months_back < 1 {
            return Err(NewswireError::InvalidConfiguration(format!(
                "months_back must be at least 1, got {}",
                search.months_back
            )));
        }

        if search.max_pages == Some(0) {
            return Err(NewswireError::InvalidConfiguration(
                "max_pages must be at least 1 when set".into(),
            ));
        }

        if search.start_url.trim().is_empty() {
            return Err(NewswireError::InvalidConfiguration(
                "start_url must not be empty".into(),
            ));
        }

        Url::parse(&search.start_url).map_err(|e| {
            NewswireError::InvalidConfiguration(format!(
                "start_url {:?} is not a URL: {}",
                search.start_url, e
            ))
        })?;

        Ok(())
    }

    /// Write the commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> std::result::Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# newswire configuration
#
# Locators starting with "/" or "(" are XPath, anything else is a CSS
# selector. Item field locators (title, date, summary, image) are
# resolved inside one result item and must be CSS.

[search]
# Phrase typed into the site search (required)
search_phrase = ""

# Optional category filter, matched against the filter label text
# category = "California"

# Calendar months to collect, counting the current month as one
months_back = 1

start_url = "https://www.latimes.com/"

# Stop after this many result pages (default: follow pagination to the end)
# max_pages = 5

[browser]
# Run browser in headless mode (no visible window)
headless = true

# Bound on every wait for a page element, in seconds
listing_timeout_secs = 15

# How often a pending wait re-checks the page (milliseconds)
poll_interval_ms = 250

# Settle time after navigation for dynamic content (milliseconds)
wait_after_load_ms = 1000

[selectors]
search_button = "button[data-element='search-button']"
search_input = "input[data-element='search-form-input']"
results_container = "ul.search-results-module-results-menu"
result_items = "ul.search-results-module-results-menu > li"
category_checkbox = "//div[contains(@class, 'search-filter-input')]//label/span[text()='{category}']/preceding::input[@type='checkbox'][1]"
sort_select = "select.select-input"
sort_newest_value = "1"
next_page = "div.search-results-module-next-page a"
title = "h3.promo-title a"
date = "p.promo-timestamp"
summary = "p.promo-description"
image = "picture img.image"
image_attribute = "src"

[output]
directory = "output"
file_name = "news_data"
# "xlsx", "csv" or "json"
format = "xlsx"
images_dir = "images"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
