use std::rc::Rc;

use super::{Checkbox, ColumnHeader, Placeholder, Row};

/// In-memory snapshot of a table: header metadata plus body rows.
///
/// This is the structural handle the controller enhances. The markup reader
/// and the DOM binding both produce one.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<ColumnHeader>,
    rows: Vec<Row>,
    placeholder: Option<Placeholder>,
}

impl Table {
    pub fn new(headers: Vec<ColumnHeader>, rows: Vec<Row>) -> Self {
        Self {
            headers,
            rows,
            placeholder: None,
        }
    }

    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    pub fn header(&self, index: usize) -> Option<&ColumnHeader> {
        self.headers.get(index)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Body rows in document order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// The header's "select all" checkbox, if the table has a selection column.
    pub fn select_all(&self) -> Option<Rc<Checkbox>> {
        self.headers
            .iter()
            .find_map(|h| h.select_all_checkbox().map(Rc::clone))
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    pub(crate) fn insert_placeholder(&mut self, placeholder: Placeholder) {
        self.placeholder = Some(placeholder);
    }

    pub(crate) fn remove_placeholder(&mut self) -> Option<Placeholder> {
        self.placeholder.take()
    }
}
