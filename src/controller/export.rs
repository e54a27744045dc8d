//! Export operations on the controller.

use crate::error::Result;
use crate::export::{self, export_filename, SHEET_NAME, TABLE_EXPORT_PREFIX};
use crate::host::CSV_MIME;
use crate::types::{ExportData, ExportOutcome, ExportRow, Row};

use super::TableController;

const EXCEL_FALLBACK_WARNING: &str =
    "Excel export requires a spreadsheet writer. Falling back to CSV.";

impl TableController {
    /// Labels of the exported columns: everything except the selection
    /// column, the ordinal column, and `no-export` columns.
    pub fn table_headers(&self) -> Vec<String> {
        self.table
            .headers()
            .iter()
            .filter(|h| h.is_exported(&self.options.ordinal_label))
            .map(|h| h.field_name().to_string())
            .collect()
    }

    /// Snapshot `rows` (default: the filtered rows) as field/value records.
    ///
    /// A row missing the cell for an exported column simply lacks that field.
    pub fn export_data(&self, rows: Option<&[Row]>) -> ExportData {
        let rows = rows.unwrap_or(&self.filtered);
        let exported: Vec<(usize, String)> = self
            .table
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_exported(&self.options.ordinal_label))
            .map(|(index, h)| (index, h.field_name().to_string()))
            .collect();

        let records = rows
            .iter()
            .map(|row| {
                let mut record = ExportRow::with_capacity(exported.len());
                for (index, field) in &exported {
                    if let Some(cell) = row.cell(*index) {
                        record.insert(field.clone(), cell.export_text());
                    }
                }
                record
            })
            .collect();

        ExportData {
            headers: exported.into_iter().map(|(_, field)| field).collect(),
            rows: records,
        }
    }

    /// Serialize export data as CSV text.
    pub fn convert_to_csv(&self, data: &ExportData) -> String {
        export::convert_to_csv(data)
    }

    /// The filtered rows as a JSON array of records, fields in column order.
    ///
    /// # Errors
    /// Returns [`TableError::Export`](crate::TableError::Export) when
    /// serialization fails.
    pub fn export_json(&self, pretty: bool) -> Result<String> {
        let data = self.export_data(None);
        let json = if pretty {
            serde_json::to_string_pretty(&data.rows)?
        } else {
            serde_json::to_string(&data.rows)?
        };
        Ok(json)
    }

    /// Timestamp used in export filenames.
    pub fn timestamp(&self) -> String {
        export::timestamp(self.now())
    }

    /// Save the filtered rows as `table-export-<timestamp>.csv`.
    ///
    /// # Errors
    /// Propagates the file sink's error.
    pub fn export_to_csv(&mut self) -> Result<ExportOutcome> {
        let data = self.export_data(None);
        let csv = self.convert_to_csv(&data);
        let filename = export_filename(TABLE_EXPORT_PREFIX, self.now(), "csv");
        self.download_file(csv.as_bytes(), &filename, CSV_MIME)?;
        log::info!("exported {} rows to {filename}", data.len());
        Ok(ExportOutcome::Saved {
            filename,
            rows: data.len(),
        })
    }

    /// Save the filtered rows as a spreadsheet, or as CSV (after warning the
    /// user) when no spreadsheet writer is installed.
    ///
    /// # Errors
    /// Propagates workbook construction and file sink errors.
    pub fn export_to_excel(&mut self) -> Result<ExportOutcome> {
        let data = self.export_data(None);
        let Some(writer) = self.spreadsheet.as_ref() else {
            log::warn!("no spreadsheet writer installed, exporting CSV instead");
            self.warn(EXCEL_FALLBACK_WARNING);
            return match self.export_to_csv()? {
                ExportOutcome::Saved { filename, rows } => {
                    Ok(ExportOutcome::FellBackToCsv { filename, rows })
                }
                other => Ok(other),
            };
        };

        let bytes = writer.build_workbook(&data, SHEET_NAME)?;
        let filename = export_filename(TABLE_EXPORT_PREFIX, self.now(), writer.extension());
        let mime_type = writer.mime_type();
        self.download_file(&bytes, &filename, mime_type)?;
        log::info!("exported {} rows to {filename}", data.len());
        Ok(ExportOutcome::Saved {
            filename,
            rows: data.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::host::MemorySink;
    use crate::types::{Checkbox, ColumnHeader, Table, TableCell};
    use chrono::{TimeZone, Utc};

    fn people() -> Table {
        let headers = vec![
            ColumnHeader::select_all(Checkbox::new(None, false)),
            ColumnHeader::new("No"),
            ColumnHeader::new(" Name "),
            ColumnHeader::new("Actions").no_export(),
        ];
        let rows = vec![
            Row::new(vec![
                TableCell::checkbox(Checkbox::new(Some("1".into()), false)),
                TableCell::row_number(),
                TableCell::text(" Smith, J. \"Jr.\" "),
                TableCell::text("edit"),
            ]),
            // Short row: no Name cell
            Row::new(vec![
                TableCell::checkbox(Checkbox::new(Some("2".into()), false)),
                TableCell::row_number(),
            ]),
        ];
        Table::new(headers, rows)
    }

    #[test]
    fn test_headers_skip_excluded_columns() {
        let table = TableController::new(people(), 10).unwrap();
        assert_eq!(table.table_headers(), ["Name"]);
    }

    #[test]
    fn test_export_data_skips_missing_cells() {
        let table = TableController::new(people(), 10).unwrap();
        let data = table.export_data(None);
        assert_eq!(data.headers, ["Name"]);
        assert_eq!(data.rows[0]["Name"], "Smith, J. \"Jr.\"");
        assert!(data.rows[1].is_empty());
    }

    #[test]
    fn test_csv_export_filename_and_content() {
        let sink = MemorySink::new();
        let mut table = TableController::builder(people())
            .sink(sink.clone())
            .clock(|| Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .build()
            .unwrap();
        let outcome = table.export_to_csv().unwrap();
        assert_eq!(outcome.filename(), Some("table-export-2024-01-02T03-04-05.csv"));

        let saved = sink.last().unwrap();
        assert_eq!(saved.mime_type, "text/csv");
        assert_eq!(saved.text(), "Name\n\"Smith, J. \"\"Jr.\"\"\"\n");
    }
}
