use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::Checkbox;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// CSS class marking a sorted header (`sort-asc` / `sort-desc`).
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Asc => "sort-asc",
            Self::Desc => "sort-desc",
        }
    }
}

/// A form control sitting inside a header cell.
#[derive(Debug, Clone)]
pub enum HeaderControl {
    /// The "select all" checkbox of the selection column.
    SelectAll(Rc<Checkbox>),
    /// Any other input, select, or button.
    Other,
}

/// Metadata for one column, read from the header row.
#[derive(Debug, Clone)]
pub struct ColumnHeader {
    label: String,
    no_export: bool,
    control: Option<HeaderControl>,
    sort_marker: Cell<Option<SortDirection>>,
}

impl ColumnHeader {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            no_export: false,
            control: None,
            sort_marker: Cell::new(None),
        }
    }

    /// A selection column whose header carries a "select all" checkbox.
    pub fn select_all(checkbox: Rc<Checkbox>) -> Self {
        Self::new("").with_control(HeaderControl::SelectAll(checkbox))
    }

    /// Flag the column as export-excluded (`no-export` class in markup).
    #[must_use]
    pub fn no_export(mut self) -> Self {
        self.no_export = true;
        self
    }

    #[must_use]
    pub fn with_control(mut self, control: HeaderControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Header text as written in the markup.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Trimmed header text; this is the field name used by exports.
    pub fn field_name(&self) -> &str {
        self.label.trim()
    }

    pub fn control(&self) -> Option<&HeaderControl> {
        self.control.as_ref()
    }

    pub fn is_no_export(&self) -> bool {
        self.no_export
    }

    pub fn is_selection_column(&self) -> bool {
        matches!(self.control, Some(HeaderControl::SelectAll(_)))
    }

    /// Whether the column is the ordinal "row number" column.
    pub fn is_ordinal_column(&self, ordinal_label: &str) -> bool {
        self.field_name() == ordinal_label
    }

    /// Headers holding a control are not click-to-sort targets.
    pub fn is_sortable(&self) -> bool {
        self.control.is_none()
    }

    /// Whether the column takes part in exported output.
    pub fn is_exported(&self, ordinal_label: &str) -> bool {
        !self.is_selection_column() && !self.is_ordinal_column(ordinal_label) && !self.no_export
    }

    pub fn select_all_checkbox(&self) -> Option<&Rc<Checkbox>> {
        match &self.control {
            Some(HeaderControl::SelectAll(cb)) => Some(cb),
            _ => None,
        }
    }

    pub fn sort_marker(&self) -> Option<SortDirection> {
        self.sort_marker.get()
    }

    pub fn set_sort_marker(&self, marker: Option<SortDirection>) {
        self.sort_marker.set(marker);
    }
}
