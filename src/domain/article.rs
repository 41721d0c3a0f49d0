use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::text::{mentions_money, phrase_count};

/// Substituted when a listing item has no summary.
pub const SUMMARY_PLACEHOLDER: &str = "No description available";

/// Substituted when an item's image could not be downloaded.
pub const ASSET_PLACEHOLDER: &str = "image-unavailable";

/// Column order of every output sink.
pub const RECORD_HEADER: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image Filename",
    "Count of Search Phrases",
    "Contains Money",
];

/// Fields read from one rendered listing item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub date_text: Option<String>,
    pub summary_text: Option<String>,
    pub asset_url: Option<String>,
}

/// One extracted output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title: String,
    pub date_text: String,
    pub summary: String,
    pub asset_filename: String,
    pub phrase_count: usize,
    pub mentions_money: bool,
}

impl ExtractedRecord {
    /// Build a record, running the text scans over title and summary.
    pub fn new(
        title: String,
        date_text: String,
        summary: String,
        asset_filename: String,
        search_phrase: &str,
    ) -> Self {
        let texts = [title.as_str(), summary.as_str()];
        let phrase_count = phrase_count(search_phrase, &texts);
        let mentions_money = mentions_money(&texts);

        Self {
            title,
            date_text,
            summary,
            asset_filename,
            phrase_count,
            mentions_money,
        }
    }

    /// Row cells in [`RECORD_HEADER`] order.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.title.clone(),
            self.date_text.clone(),
            self.summary.clone(),
            self.asset_filename.clone(),
            self.phrase_count.to_string(),
            if self.mentions_money { "True" } else { "False" }.to_string(),
        ]
    }
}

/// Why an item produced no record without stopping the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnreadableTitle,
    MissingDate,
    StaleRetryExhausted,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnreadableTitle => "unreadable-title",
            SkipReason::MissingDate => "missing-date",
            SkipReason::StaleRetryExhausted => "stale-retry-exhausted",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
