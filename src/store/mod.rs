mod csv;
mod json;
mod xlsx;

use std::path::Path;

use crate::app::Result;
use crate::config::OutputFormat;
use crate::domain::ExtractedRecord;

pub use self::csv::CsvSink;
pub use self::json::JsonSink;
pub use self::xlsx::XlsxSink;

/// Bulk writer for the records of one run.
pub trait RecordSink {
    /// Write `rows` to `path`, replacing any previous file.
    fn write(&self, rows: &[ExtractedRecord], path: &Path) -> Result<()>;
}

pub fn sink_for(format: OutputFormat) -> Box<dyn RecordSink + Send + Sync> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxSink),
        OutputFormat::Csv => Box::new(CsvSink),
        OutputFormat::Json => Box::new(JsonSink),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
