use thiserror::Error;

use crate::domain::DateParseError;
use crate::scraper::SurfaceError;

#[derive(Error, Debug)]
pub enum NewswireError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Listing did not render {locator:?} within {waited_secs}s")]
    ListingTimeout { locator: String, waited_secs: u64 },

    #[error(transparent)]
    DateParse(#[from] DateParseError),

    #[error("Automation error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NewswireError {
    /// Map a surface failure raised while waiting for a page-level locator.
    pub fn from_wait(err: SurfaceError) -> Self {
        match err {
            SurfaceError::Timeout { locator, waited } => NewswireError::ListingTimeout {
                locator,
                waited_secs: waited.as_secs(),
            },
            other => NewswireError::Surface(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, NewswireError>;
