//! Rendering: mirror the view state into row visibility and the control surface.

use std::rc::Rc;

use crate::pagination::{clamp_page, info_text, page_buttons, page_range};
use crate::types::{Checkbox, Placeholder, Row, SelectAllState};

use super::TableController;

impl TableController {
    /// Re-render the table body and every dynamic control.
    pub fn render(&mut self) {
        self.view.page = clamp_page(self.view.page, self.filtered.len(), self.view.per_page);
        self.render_table();
        self.update_selection_counter();
        self.update_select_all();
        self.update_info();
        self.render_pagination();

        for extension in self.extensions.clone() {
            extension.after_render(self);
        }
    }

    fn render_table(&mut self) {
        // The old placeholder goes first so it never counts as content.
        self.table.remove_placeholder();
        for row in self.table.rows() {
            row.set_hidden(true);
        }

        if self.filtered.is_empty() {
            self.table.insert_placeholder(Placeholder {
                colspan: self.table.column_count(),
                message: self.options.empty_message.clone(),
            });
            return;
        }

        let visible = self.visible_rows().to_vec();
        for row in &visible {
            row.set_hidden(false);
        }
        self.restore_checkboxes(&visible);
        self.update_row_numbers(&visible);
    }

    /// Re-apply remembered checkbox state to the rows being shown.
    fn restore_checkboxes(&self, visible: &[Row]) {
        for checkbox in visible.iter().filter_map(Row::checkbox) {
            if let Some(checked) = self.selection.get(&checkbox) {
                checkbox.set_checked(checked);
            }
        }
    }

    fn update_row_numbers(&self, visible: &[Row]) {
        let (start, _) = page_range(self.view.page, self.view.per_page, self.filtered.len());
        for (offset, row) in visible.iter().enumerate() {
            if let Some(cell) = row.row_number_cell() {
                cell.set_text((start + offset + 1).to_string());
            }
        }
    }

    pub(super) fn update_selection_counter(&mut self) {
        self.controls.selection_counter =
            format!("{} of {} selected", self.selected_count(), self.filtered.len());
    }

    /// Select-all is checked iff every checkbox on the page is checked, and
    /// disabled when the page has none.
    pub(super) fn update_select_all(&mut self) {
        let Some(select_all) = self.table.select_all() else {
            self.controls.select_all = None;
            return;
        };
        let visible: Vec<Rc<Checkbox>> =
            self.visible_rows().iter().filter_map(Row::checkbox).collect();
        let state = if visible.is_empty() {
            SelectAllState {
                checked: false,
                disabled: true,
            }
        } else {
            SelectAllState {
                checked: visible.iter().all(|cb| cb.is_checked()),
                disabled: false,
            }
        };
        select_all.set_checked(state.checked);
        select_all.set_disabled(state.disabled);
        self.controls.select_all = Some(state);
    }

    fn update_info(&mut self) {
        self.controls.info = info_text(self.view.page, self.view.per_page, self.filtered.len());
    }

    fn render_pagination(&mut self) {
        self.controls.pagination = page_buttons(self.view.page, self.total_pages());
    }
}
