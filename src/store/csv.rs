use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::app::Result;
use crate::domain::{ExtractedRecord, RECORD_HEADER};
use crate::store::{ensure_parent, RecordSink};

/// Comma-separated output with a fixed header row.
pub struct CsvSink;

impl RecordSink for CsvSink {
    fn write(&self, rows: &[ExtractedRecord], path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let mut out = BufWriter::new(File::create(path)?);
        write_records(&mut out, rows)?;
        out.flush()?;
        Ok(())
    }
}

fn write_records<W: Write>(mut w: W, rows: &[ExtractedRecord]) -> io::Result<()> {
    write_row(&mut w, &RECORD_HEADER)?;
    for record in rows {
        write_row(&mut w, &record.to_row())?;
    }
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(mut w: W, cells: &[S]) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

fn needs_quotes(cell: &str) -> bool {
    cell.contains([',', '"', '\n', '\r'])
}
