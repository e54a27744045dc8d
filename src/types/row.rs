use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A checkbox control living in a header or body cell.
///
/// Checkboxes are shared handles: the row that owns one and the selection
/// bookkeeping both refer to the same control, and identity (not value) is
/// what the controller keys on.
#[derive(Debug, Default)]
pub struct Checkbox {
    checked: Cell<bool>,
    disabled: Cell<bool>,
    value: Option<String>,
}

impl Checkbox {
    pub fn new(value: Option<String>, checked: bool) -> Rc<Self> {
        Rc::new(Self {
            checked: Cell::new(checked),
            disabled: Cell::new(false),
            value,
        })
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// The `value` attribute, used as the row identifier by selection export.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// One piece of cell content.
#[derive(Debug, Clone)]
pub enum CellNode {
    Text(String),
    /// A button control; its label counts as text content but is stripped on export.
    Button(String),
    Checkbox(Rc<Checkbox>),
    /// Any other form control (select, text input). Contributes no text.
    Control,
}

/// A body cell.
#[derive(Debug, Default)]
pub struct TableCell {
    nodes: RefCell<Vec<CellNode>>,
    row_number: bool,
}

impl TableCell {
    pub fn new(nodes: Vec<CellNode>) -> Self {
        Self {
            nodes: RefCell::new(nodes),
            row_number: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![CellNode::Text(text.into())])
    }

    /// An ordinal cell whose text the controller rewrites on every render.
    pub fn row_number() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            row_number: true,
        }
    }

    pub fn checkbox(checkbox: Rc<Checkbox>) -> Self {
        Self::new(vec![CellNode::Checkbox(checkbox)])
    }

    /// Mark an existing cell as the ordinal cell.
    #[must_use]
    pub fn into_row_number(mut self) -> Self {
        self.row_number = true;
        self
    }

    pub fn is_row_number(&self) -> bool {
        self.row_number
    }

    /// Full text content, button labels included.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.nodes.borrow().iter() {
            match node {
                CellNode::Text(t) | CellNode::Button(t) => out.push_str(t),
                CellNode::Checkbox(_) | CellNode::Control => {}
            }
        }
        out
    }

    /// Trimmed text with button controls removed.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        for node in self.nodes.borrow().iter() {
            if let CellNode::Text(t) = node {
                out.push_str(t);
            }
        }
        out.trim().to_string()
    }

    /// Replace the cell's content with a single text node.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.nodes.borrow_mut() = vec![CellNode::Text(text.into())];
    }

    pub fn checkbox_control(&self) -> Option<Rc<Checkbox>> {
        self.nodes.borrow().iter().find_map(|node| match node {
            CellNode::Checkbox(cb) => Some(Rc::clone(cb)),
            _ => None,
        })
    }

    /// Snapshot of the cell's content nodes.
    pub fn nodes(&self) -> Vec<CellNode> {
        self.nodes.borrow().clone()
    }
}

#[derive(Debug)]
struct RowNode {
    cells: Vec<TableCell>,
    hidden: Cell<bool>,
}

/// Handle to one body row.
///
/// Cloning a `Row` clones the handle, not the record: every clone observes the
/// same visibility flag and cell content.
pub struct Row(Rc<RowNode>);

impl Row {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self(Rc::new(RowNode {
            cells,
            hidden: Cell::new(false),
        }))
    }

    /// Convenience constructor for a row of plain text cells.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(TableCell::text).collect())
    }

    pub fn cells(&self) -> &[TableCell] {
        &self.0.cells
    }

    pub fn cell(&self, index: usize) -> Option<&TableCell> {
        self.0.cells.get(index)
    }

    /// Concatenated text content of every cell.
    pub fn text_content(&self) -> String {
        self.0.cells.iter().map(TableCell::text_content).collect()
    }

    /// The first checkbox found in the row, if any.
    pub fn checkbox(&self) -> Option<Rc<Checkbox>> {
        self.0.cells.iter().find_map(TableCell::checkbox_control)
    }

    pub fn row_number_cell(&self) -> Option<&TableCell> {
        self.0.cells.iter().find(|c| c.is_row_number())
    }

    pub fn is_hidden(&self) -> bool {
        self.0.hidden.get()
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.0.hidden.set(hidden);
    }

    /// Whether two handles refer to the same row.
    pub fn ptr_eq(&self, other: &Row) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Clone for Row {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("text", &self.text_content())
            .field("hidden", &self.is_hidden())
            .finish()
    }
}

/// The "no data" row shown instead of data rows when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub colspan: usize,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_includes_buttons() {
        let cell = TableCell::new(vec![
            CellNode::Text(" Alice ".into()),
            CellNode::Button("Edit".into()),
        ]);
        assert_eq!(cell.text_content(), " Alice Edit");
        assert_eq!(cell.export_text(), "Alice");
    }

    #[test]
    fn test_row_clone_shares_state() {
        let row = Row::from_texts(["a", "b"]);
        let other = row.clone();
        other.set_hidden(true);
        assert!(row.is_hidden());
        assert!(row.ptr_eq(&other));
        assert!(!row.ptr_eq(&Row::from_texts(["a", "b"])));
    }

    #[test]
    fn test_row_checkbox_lookup() {
        let cb = Checkbox::new(Some("7".into()), false);
        let row = Row::new(vec![TableCell::checkbox(Rc::clone(&cb)), TableCell::text("x")]);
        let found = row.checkbox().unwrap();
        assert!(Rc::ptr_eq(&found, &cb));
        assert_eq!(found.value(), Some("7"));
    }

    #[test]
    fn test_row_number_cell_rewrite() {
        let row = Row::new(vec![TableCell::row_number(), TableCell::text("Bob")]);
        row.row_number_cell().unwrap().set_text("3");
        assert_eq!(row.text_content(), "3Bob");
    }
}
