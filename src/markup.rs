//! Reads table markup into the in-memory [`Table`] model.
//!
//! The reader is deliberately lenient so that hand-written HTML works:
//! valueless attributes (`checked`), unclosed void elements (`<input>`),
//! mismatched end tags, and HTML-only entities such as `&nbsp;` are accepted.
//!
//! Recognized structure:
//! - `<thead>` cells become [`ColumnHeader`]s. A nested checkbox makes the
//!   column the selection column; any other control makes it unsortable;
//!   class `no-export` excludes it from exports.
//! - Every other `<tr>` is a body row. Cells with class `row-number` are
//!   ordinal cells; `<button>` labels and checkbox inputs are kept as nodes.

use std::borrow::Cow;
use std::rc::Rc;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::error::{Result, TableError};
use crate::types::{CellNode, Checkbox, ColumnHeader, HeaderControl, Row, Table, TableCell};

const NO_EXPORT_CLASS: &str = "no-export";
const ROW_NUMBER_CLASS: &str = "row-number";

/// Parse a complete `<table>` element.
///
/// # Errors
/// Returns [`TableError::InvalidInput`] when the markup holds no `<table>` or
/// the table has no body (neither a `<tbody>` nor a row outside `<thead>`),
/// or [`TableError::Markup`] when it is not readable at all.
pub fn parse_table(markup: &str) -> Result<Table> {
    let mut builder = TableReader::new(true);
    read_events(markup, &mut builder)?;
    if !builder.saw_table {
        return Err(TableError::InvalidInput(
            "markup contains no <table> element".to_string(),
        ));
    }
    if !builder.saw_body {
        return Err(TableError::InvalidInput("table has no body".to_string()));
    }
    Ok(Table::new(builder.headers, builder.rows))
}

/// Parse a fragment of `<tr>` elements, e.g. replacement body content.
///
/// # Errors
/// Returns [`TableError::Markup`] when the fragment is not readable.
pub fn parse_rows(markup: &str) -> Result<Vec<Row>> {
    let mut builder = TableReader::new(false);
    read_events(markup, &mut builder)?;
    Ok(builder.rows)
}

fn read_events(markup: &str, builder: &mut TableReader) -> Result<()> {
    let mut reader = Reader::from_str(markup);
    reader.check_end_names(false);

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => builder.open(e, false),
            Event::Empty(ref e) => builder.open(e, true),
            Event::End(ref e) => builder.close(&lower_name(e.local_name().as_ref())),
            Event::Text(ref e) => builder.text(&decode_text(e)),
            Event::CData(ref e) => builder.text(&String::from_utf8_lossy(e)),
            Event::Eof => break,
            _ => {}
        }
        if builder.finished {
            break;
        }
    }
    builder.flush();
    Ok(())
}

fn lower_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

/// Decode a text node, mapping the HTML entities XML does not know.
fn decode_text(e: &BytesText) -> String {
    let resolved = e.unescape_with(|entity| match entity {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        "copy" => Some("©"),
        "hellip" => Some("…"),
        "ndash" => Some("–"),
        "mdash" => Some("—"),
        _ => None,
    });
    match resolved {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

/// HTML-style attribute lookup (case-insensitive key, valueless allowed).
fn attr(e: &BytesStart, key: &str) -> Option<String> {
    for attr in e.html_attributes().flatten() {
        if attr.key.local_name().as_ref().eq_ignore_ascii_case(key.as_bytes()) {
            let value = attr
                .unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()));
            return Some(value.into_owned());
        }
    }
    None
}

fn has_class(e: &BytesStart, class: &str) -> bool {
    attr(e, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Head,
    Body,
}

#[derive(Debug, Default)]
struct CellReader {
    nodes: Vec<CellNode>,
    no_export: bool,
    row_number: bool,
    header_control: Option<HeaderControl>,
}

impl CellReader {
    fn push_text(&mut self, text: &str) {
        if let Some(CellNode::Text(last)) = self.nodes.last_mut() {
            last.push_str(text);
        } else {
            self.nodes.push(CellNode::Text(text.to_string()));
        }
    }

    fn text_content(&self) -> String {
        TableCell::new(self.nodes.clone()).text_content()
    }
}

struct TableReader {
    /// Only content inside the first `<table>` counts.
    require_table: bool,
    saw_table: bool,
    /// A `<tbody>` or a body row was seen inside the table.
    saw_body: bool,
    table_depth: usize,
    finished: bool,
    section: Section,
    headers: Vec<ColumnHeader>,
    rows: Vec<Row>,
    row: Option<Vec<TableCell>>,
    cell: Option<CellReader>,
    button: Option<String>,
    /// Element whose content is ignored (script, style, select, textarea) and its nesting depth.
    skip: Option<(String, usize)>,
}

impl TableReader {
    fn new(require_table: bool) -> Self {
        Self {
            require_table,
            saw_table: false,
            saw_body: false,
            table_depth: 0,
            finished: false,
            section: Section::Body,
            headers: Vec::new(),
            rows: Vec::new(),
            row: None,
            cell: None,
            button: None,
            skip: None,
        }
    }

    fn active(&self) -> bool {
        !self.require_table || self.table_depth == 1
    }

    fn open(&mut self, e: &BytesStart, empty: bool) {
        let name = lower_name(e.local_name().as_ref());

        if let Some((skip_name, depth)) = self.skip.as_mut() {
            if *skip_name == name && !empty {
                *depth += 1;
            }
            return;
        }

        if name == "table" {
            self.saw_table = true;
            if !empty {
                self.table_depth += 1;
            }
            return;
        }
        if !self.active() {
            return;
        }

        match name.as_str() {
            "thead" => self.section = Section::Head,
            "tbody" => {
                self.section = Section::Body;
                self.saw_body = true;
            }
            "tfoot" => self.section = Section::Body,
            "tr" => {
                self.finish_row();
                self.row = Some(Vec::new());
                if empty {
                    self.finish_row();
                }
            }
            "td" | "th" => {
                self.finish_cell();
                if self.row.is_none() {
                    self.row = Some(Vec::new());
                }
                self.cell = Some(CellReader {
                    no_export: has_class(e, NO_EXPORT_CLASS),
                    row_number: has_class(e, ROW_NUMBER_CLASS),
                    ..CellReader::default()
                });
                if empty {
                    self.finish_cell();
                }
            }
            "button" => {
                if self.cell.is_some() {
                    self.button = Some(String::new());
                    if empty {
                        self.finish_button();
                    }
                }
            }
            "input" => self.open_input(e),
            "select" | "textarea" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.nodes.push(CellNode::Control);
                    cell.header_control.get_or_insert(HeaderControl::Other);
                }
                if !empty {
                    self.skip = Some((name, 1));
                }
            }
            "script" | "style" => {
                if !empty {
                    self.skip = Some((name, 1));
                }
            }
            _ => {}
        }
    }

    fn open_input(&mut self, e: &BytesStart) {
        let Some(cell) = self.cell.as_mut() else {
            return;
        };
        let is_checkbox = attr(e, "type").is_some_and(|t| t.eq_ignore_ascii_case("checkbox"));
        if is_checkbox {
            let checked = attr(e, "checked").is_some_and(|v| !v.eq_ignore_ascii_case("false"));
            let checkbox = Checkbox::new(attr(e, "value"), checked);
            if attr(e, "disabled").is_some() {
                checkbox.set_disabled(true);
            }
            cell.header_control = Some(HeaderControl::SelectAll(Rc::clone(&checkbox)));
            cell.nodes.push(CellNode::Checkbox(checkbox));
        } else {
            cell.nodes.push(CellNode::Control);
            cell.header_control.get_or_insert(HeaderControl::Other);
        }
    }

    fn close(&mut self, name: &str) {
        if let Some((skip_name, depth)) = self.skip.as_mut() {
            if skip_name == name {
                *depth -= 1;
                if *depth == 0 {
                    self.skip = None;
                }
            }
            return;
        }

        if name == "table" {
            if self.table_depth == 1 {
                self.flush();
                if self.require_table {
                    self.finished = true;
                }
            }
            self.table_depth = self.table_depth.saturating_sub(1);
            return;
        }
        if !self.active() {
            return;
        }

        match name {
            "thead" => {
                self.flush();
                self.section = Section::Body;
            }
            "tbody" | "tfoot" => self.flush(),
            "tr" => self.finish_row(),
            "td" | "th" => self.finish_cell(),
            "button" => self.finish_button(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.skip.is_some() || !self.active() {
            return;
        }
        if let Some(button) = self.button.as_mut() {
            button.push_str(text);
        } else if let Some(cell) = self.cell.as_mut() {
            cell.push_text(text);
        }
    }

    fn finish_button(&mut self) {
        if let (Some(label), Some(cell)) = (self.button.take(), self.cell.as_mut()) {
            cell.nodes.push(CellNode::Button(label));
        }
    }

    fn finish_cell(&mut self) {
        self.finish_button();
        let Some(cell) = self.cell.take() else {
            return;
        };
        match self.section {
            Section::Head => {
                let mut header = ColumnHeader::new(cell.text_content());
                if cell.no_export {
                    header = header.no_export();
                }
                if let Some(control) = cell.header_control {
                    header = header.with_control(control);
                }
                self.headers.push(header);
            }
            Section::Body => {
                let mut table_cell = TableCell::new(cell.nodes);
                if cell.row_number {
                    table_cell = table_cell.into_row_number();
                }
                if let Some(row) = self.row.as_mut() {
                    row.push(table_cell);
                }
            }
        }
    }

    fn finish_row(&mut self) {
        self.finish_cell();
        let Some(cells) = self.row.take() else {
            return;
        };
        if self.section == Section::Body {
            self.saw_body = true;
            self.rows.push(Row::new(cells));
        }
    }

    /// Close whatever is still open (lenient end-of-input handling).
    fn flush(&mut self) {
        self.finish_row();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
<table class="simpletable">
  <thead>
    <tr>
      <th><input type="checkbox"></th>
      <th>No</th>
      <th>Name</th>
      <th class="no-export">Actions</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <td><input type="checkbox" value="17" checked></td>
      <td class="row-number">1</td>
      <td>Alice &amp; Co&nbsp;Ltd</td>
      <td><button>Edit</button> <a href="x">view</a></td>
    </tr>
    <tr>
      <td><input type="checkbox" value="18"/></td>
      <td class="row-number">2</td>
      <td>Bob</td>
      <td></td>
    </tr>
  </tbody>
</table>"#;

    #[test]
    fn test_headers() {
        let table = parse_table(SAMPLE).unwrap();
        let headers = table.headers();
        assert_eq!(headers.len(), 4);
        assert!(headers[0].is_selection_column());
        assert!(headers[1].is_ordinal_column("No"));
        assert_eq!(headers[2].field_name(), "Name");
        assert!(headers[2].is_sortable());
        assert!(headers[3].is_no_export());
        assert!(table.select_all().is_some());
    }

    #[test]
    fn test_rows_and_cells() {
        let table = parse_table(SAMPLE).unwrap();
        let rows = table.rows();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        let cb = first.checkbox().unwrap();
        assert_eq!(cb.value(), Some("17"));
        assert!(cb.is_checked());
        assert!(first.cells()[1].is_row_number());
        assert_eq!(first.cells()[2].export_text(), "Alice & Co\u{a0}Ltd");
        assert_eq!(first.cells()[3].export_text(), "view");
        assert!(first.cells()[3].text_content().contains("Edit"));

        assert!(!rows[1].checkbox().unwrap().is_checked());
    }

    #[test]
    fn test_missing_table_is_invalid_input() {
        let err = parse_table("<div>nothing</div>").unwrap_err();
        assert!(matches!(err, TableError::InvalidInput(_)));
    }

    #[test]
    fn test_table_without_body_is_invalid_input() {
        let err = parse_table("<table><thead><tr><th>A</th></tr></thead></table>").unwrap_err();
        assert!(matches!(err, TableError::InvalidInput(_)));
        // An empty body is still a body
        let table =
            parse_table("<table><thead><tr><th>A</th></tr></thead><tbody></tbody></table>").unwrap();
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_rows_without_tbody() {
        let table =
            parse_table("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>").unwrap();
        // Without a thead every row is a body row
        assert!(table.headers().is_empty());
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn test_parse_row_fragment() {
        let rows = parse_rows("<tr><td>x</td><td>1</td></tr><tr><td>y</td><td>2</td></tr>").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text_content(), "y2");
    }

    #[test]
    fn test_select_content_is_skipped() {
        let rows = parse_rows(
            "<tr><td>pick<select><option>one</option><option>two</option></select></td></tr>",
        )
        .unwrap();
        assert_eq!(rows[0].text_content(), "pick");
    }

    #[test]
    fn test_content_after_table_ignored() {
        let table = parse_table(
            "<table><tbody><tr><td>in</td></tr></tbody></table><table><tbody><tr><td>out</td></tr></tbody></table>",
        )
        .unwrap();
        assert_eq!(table.rows().len(), 1);
    }
}
