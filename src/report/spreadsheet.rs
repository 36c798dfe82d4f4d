//! Excel report: one row per detected code, no images.

use crate::output::ReportRecord;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};

/// Worksheet name, matching what spreadsheet tools create by default.
pub const SHEET_NAME: &str = "Sheet1";

/// Column titles of the spreadsheet.
pub const HEADERS: [&str; 3] = ["PDF File", "Tag", "QR Code"];

const COLUMN_WIDTHS: [f64; 3] = [32.0, 18.0, 60.0];

/// Build the workbook for `records` and return the `.xlsx` bytes.
///
/// Rows follow `records` order. An empty slice produces the header row alone.
pub fn render_spreadsheet(records: &[ReportRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
        worksheet.set_column_width(col as u16, width)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, record.source_file())?;
        worksheet.write_string(row, 1, record.tag())?;
        worksheet.write_string(row, 2, record.payload())?;
    }

    workbook.save_to_buffer()
}
