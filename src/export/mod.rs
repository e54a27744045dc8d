//! Export pipeline: tabular snapshot to CSV text or an XLSX workbook.

pub mod csv;
pub(crate) mod sheet_writer;
pub mod xlsx;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::ExportData;

pub use self::csv::{convert_to_csv, escape_field, parse_csv};
pub use self::xlsx::XlsxWriter;

/// Filename stem for whole-table exports.
pub const TABLE_EXPORT_PREFIX: &str = "table-export";
/// Filename stem for selected-row exports.
pub const SELECTED_EXPORT_PREFIX: &str = "selected-data";
/// Worksheet name used for spreadsheet exports.
pub const SHEET_NAME: &str = "Sheet1";

/// Optional capability that turns tabular data into a spreadsheet file.
///
/// When the controller has none, spreadsheet export degrades to CSV.
pub trait SpreadsheetWriter {
    /// Build a single-sheet workbook and return its file bytes.
    fn build_workbook(&self, data: &ExportData, sheet_name: &str) -> Result<Vec<u8>>;

    fn mime_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;
}

/// ISO-8601 instant truncated to seconds, with `:` replaced by `-`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// `<prefix>-<timestamp>.<extension>`
pub fn export_filename(prefix: &str, at: DateTime<Utc>, extension: &str) -> String {
    format!("{prefix}-{}.{extension}", timestamp(at))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(timestamp(at), "2024-03-09T07-05-01");
        assert_eq!(
            export_filename(TABLE_EXPORT_PREFIX, at, "csv"),
            "table-export-2024-03-09T07-05-01.csv"
        );
    }
}
