//! "Export only the checked rows".
//!
//! [`SelectionExportExtension`] adds the `✓` button to the export group and
//! routes its action; [`SelectionExport`] adds the query and export methods to
//! [`TableController`] using nothing but its public API.

use crate::controller::TableController;
use crate::controls::{Action, ControlButton, ControlSet};
use crate::error::Result;
use crate::export::{export_filename, SELECTED_EXPORT_PREFIX};
use crate::extension::TableExtension;
use crate::host::CSV_MIME;
use crate::types::{ExportOutcome, Row};

/// Action id of the "Export Selected Rows" button.
pub const EXPORT_SELECTED_ACTION: &str = "export-selected";

const NOTHING_SELECTED_WARNING: &str = "No rows selected. Check the rows you want to export.";

pub fn export_selected_action() -> Action {
    Action::custom(EXPORT_SELECTED_ACTION)
}

/// Selection-aware queries and export.
pub trait SelectionExport {
    /// Filtered rows whose checkbox is checked, in display order.
    fn selected_rows(&self) -> Vec<Row>;

    /// `value` attributes of the selected rows' checkboxes; rows without one are skipped.
    fn selected_ids(&self) -> Vec<String>;

    /// Save the selected rows as `selected-data-<timestamp>.csv`.
    ///
    /// With nothing selected the user is warned and no file is produced.
    ///
    /// # Errors
    /// Propagates the file sink's error.
    fn export_selected(&mut self) -> Result<ExportOutcome>;
}

impl SelectionExport for TableController {
    fn selected_rows(&self) -> Vec<Row> {
        self.filtered_rows()
            .iter()
            .filter(|row| row.checkbox().is_some_and(|cb| cb.is_checked()))
            .cloned()
            .collect()
    }

    fn selected_ids(&self) -> Vec<String> {
        self.selected_rows()
            .iter()
            .filter_map(Row::checkbox)
            .filter_map(|cb| cb.value().map(str::to_string))
            .collect()
    }

    fn export_selected(&mut self) -> Result<ExportOutcome> {
        let selected = self.selected_rows();
        if selected.is_empty() {
            log::warn!("export of selected rows requested with nothing selected");
            self.warn(NOTHING_SELECTED_WARNING);
            return Ok(ExportOutcome::NothingSelected);
        }

        let data = self.export_data(Some(&selected));
        let csv = self.convert_to_csv(&data);
        let filename = export_filename(SELECTED_EXPORT_PREFIX, self.now(), "csv");
        self.download_file(csv.as_bytes(), &filename, CSV_MIME)?;
        self.inform(&format!("Exported {} selected rows.", selected.len()));
        Ok(ExportOutcome::Saved {
            filename,
            rows: selected.len(),
        })
    }
}

/// Adds the export-selected button in front of the CSV button.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionExportExtension;

impl SelectionExportExtension {
    pub fn new() -> Self {
        Self
    }
}

impl TableExtension for SelectionExportExtension {
    fn name(&self) -> &str {
        "selection-export"
    }

    fn create_controls(&self, controls: &mut ControlSet) {
        controls.insert_button_before(
            &Action::ExportCsv,
            ControlButton::new(export_selected_action(), "selected", "✓", "Export Selected Rows"),
        );
    }

    fn handle_action(
        &self,
        controller: &mut TableController,
        action: &Action,
    ) -> Result<Option<ExportOutcome>> {
        if *action != export_selected_action() {
            return Ok(None);
        }
        controller.export_selected().map(Some)
    }
}
