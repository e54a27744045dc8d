//! Declarative description of the control surface around a table.
//!
//! The controller builds a [`ControlSet`] once (`create_controls`), lets
//! extensions amend it, and refreshes its dynamic parts on every render. The
//! DOM binding turns it into elements; headless hosts read it directly.

use serde::{Deserialize, Serialize};

use crate::types::{PageButton, SelectAllState};

pub const SEARCH_PLACEHOLDER: &str = "Search...";
pub const DEFAULT_PER_PAGE_OPTIONS: [usize; 5] = [5, 10, 20, 50, 100];

/// What a control does when activated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    ExportCsv,
    ExportExcel,
    /// An action contributed by an extension, routed by id.
    Custom(String),
}

impl Action {
    pub fn custom(id: impl Into<String>) -> Self {
        Self::Custom(id.into())
    }
}

/// A button in the export group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlButton {
    pub action: Action,
    /// Extra CSS class after `simpletable-export-btn`.
    pub class: String,
    pub label: String,
    pub title: String,
}

impl ControlButton {
    pub fn new(
        action: Action,
        class: impl Into<String>,
        label: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            action,
            class: class.into(),
            label: label.into(),
            title: title.into(),
        }
    }
}

/// The full control surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSet {
    pub search_placeholder: String,
    pub search_value: String,
    pub export_group: Vec<ControlButton>,
    pub per_page_options: Vec<usize>,
    pub per_page: usize,
    pub selection_counter: String,
    pub pagination: Vec<PageButton>,
    pub info: String,
    pub select_all: Option<SelectAllState>,
}

impl ControlSet {
    /// The base controls: search box, CSV and Excel buttons, per-page selector.
    pub fn base(per_page: usize, per_page_options: &[usize]) -> Self {
        let mut options = per_page_options.to_vec();
        if !options.contains(&per_page) {
            options.push(per_page);
            options.sort_unstable();
        }
        Self {
            search_placeholder: SEARCH_PLACEHOLDER.to_string(),
            search_value: String::new(),
            export_group: vec![
                ControlButton::new(Action::ExportCsv, "csv", "📊", "Export to CSV"),
                ControlButton::new(Action::ExportExcel, "excel", "📗", "Export to Excel"),
            ],
            per_page_options: options,
            per_page,
            selection_counter: String::new(),
            pagination: Vec::new(),
            info: String::new(),
            select_all: None,
        }
    }

    /// Per-page choices as the selector shows them.
    pub fn per_page_labels(&self) -> Vec<String> {
        self.per_page_options.iter().map(ToString::to_string).collect()
    }

    pub fn button_position(&self, action: &Action) -> Option<usize> {
        self.export_group.iter().position(|b| &b.action == action)
    }

    /// Insert `button` right before the button for `before`, or append it.
    pub fn insert_button_before(&mut self, before: &Action, button: ControlButton) {
        let index = self
            .button_position(before)
            .unwrap_or(self.export_group.len());
        self.export_group.insert(index, button);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_base_controls() {
        let controls = ControlSet::base(10, &DEFAULT_PER_PAGE_OPTIONS);
        assert_eq!(controls.search_placeholder, "Search...");
        assert_eq!(controls.export_group.len(), 2);
        assert_eq!(controls.export_group[0].action, Action::ExportCsv);
        assert_eq!(controls.per_page_options, vec![5, 10, 20, 50, 100]);
    }

    #[test]
    fn test_unlisted_per_page_is_added() {
        let controls = ControlSet::base(25, &DEFAULT_PER_PAGE_OPTIONS);
        assert_eq!(controls.per_page_options, vec![5, 10, 20, 25, 50, 100]);
        assert_eq!(controls.per_page_labels(), ["5", "10", "20", "25", "50", "100"]);
    }

    #[test]
    fn test_insert_before() {
        let mut controls = ControlSet::base(10, &DEFAULT_PER_PAGE_OPTIONS);
        let extra = ControlButton::new(Action::custom("x"), "x", "x", "x");
        controls.insert_button_before(&Action::ExportCsv, extra);
        assert_eq!(controls.export_group[0].action, Action::custom("x"));

        let tail = ControlButton::new(Action::custom("y"), "y", "y", "y");
        controls.insert_button_before(&Action::custom("missing"), tail);
        assert_eq!(controls.export_group[3].action, Action::custom("y"));
    }
}
