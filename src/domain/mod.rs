pub mod article;
pub mod date;
pub mod text;
pub mod window;

pub use article::{
    ExtractedRecord, RawArticle, SkipReason, ASSET_PLACEHOLDER, RECORD_HEADER,
    SUMMARY_PLACEHOLDER,
};
pub use date::{DateParseError, DateParser, ParsedDate};
pub use window::RecencyWindow;
