use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::Result;
use crate::domain::ExtractedRecord;
use crate::store::{ensure_parent, RecordSink};

/// Pretty-printed JSON array of records.
pub struct JsonSink;

impl RecordSink for JsonSink {
    fn write(&self, rows: &[ExtractedRecord], path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, rows)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
