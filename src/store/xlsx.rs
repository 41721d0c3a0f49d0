use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::app::Result;
use crate::domain::{ExtractedRecord, RECORD_HEADER};
use crate::store::{ensure_parent, RecordSink};

/// Single-sheet Excel workbook with a bold header row.
pub struct XlsxSink;

impl RecordSink for XlsxSink {
    fn write(&self, rows: &[ExtractedRecord], path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let mut workbook = Workbook::new();
        fill_sheet(workbook.add_worksheet(), rows)?;
        workbook.save(path)?;
        Ok(())
    }
}

fn fill_sheet(sheet: &mut Worksheet, rows: &[ExtractedRecord]) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col, name) in (0u16..).zip(RECORD_HEADER) {
        sheet.write_string_with_format(0, col, name, &bold)?;
    }

    for (row, record) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, record.title.as_str())?;
        sheet.write_string(row, 1, record.date_text.as_str())?;
        sheet.write_string(row, 2, record.summary.as_str())?;
        sheet.write_string(row, 3, record.asset_filename.as_str())?;
        sheet.write_number(row, 4, record.phrase_count as f64)?;
        sheet.write_boolean(row, 5, record.mentions_money)?;
    }
    Ok(())
}
