//! `TableController` - owns the rows, the view state, and the selection.
//!
//! Every mutating operation recomputes the derived view (filtered rows, page
//! slice) and re-renders, so after any call the row visibility flags, the
//! placeholder, and the [`ControlSet`] describe exactly what should be shown.
//!
//! ```
//! use simpletable::TableController;
//!
//! let html = "<table><thead><tr><th>Name</th></tr></thead>\
//!             <tbody><tr><td>Ann</td></tr><tr><td>Bob</td></tr></tbody></table>";
//! let mut table = TableController::from_markup(html, 10)?;
//! table.set_search("bo");
//! assert_eq!(table.filtered_rows().len(), 1);
//! # Ok::<(), simpletable::TableError>(())
//! ```

mod export;
mod render;

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::controls::{Action, ControlSet, DEFAULT_PER_PAGE_OPTIONS};
use crate::debounce::{Debounce, DEFAULT_DEBOUNCE_MS};
use crate::error::{Result, TableError};
use crate::export::{SpreadsheetWriter, XlsxWriter};
use crate::extension::TableExtension;
use crate::host::{FileSink, LogNotifier, Notifier};
use crate::markup;
use crate::pagination::{clamp_page, page_range, total_pages};
use crate::selection::SelectionState;
use crate::sort::sort_rows;
use crate::types::{
    Checkbox, ExportOutcome, PageButtonKind, Row, SortDirection, Table, ViewState,
};

/// Default page size.
pub const DEFAULT_PER_PAGE: usize = 10;
/// Header label that marks the ordinal column.
pub const DEFAULT_ORDINAL_LABEL: &str = "No";
/// Placeholder text when no row matches.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data found";

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Replacement rows for [`TableController::update_data`].
#[derive(Debug, Clone)]
pub enum RowSource {
    Rows(Vec<Row>),
    /// A fragment of `<tr>` markup.
    Markup(String),
}

/// Static options fixed at build time.
#[derive(Debug, Clone)]
struct TableOptions {
    ordinal_label: String,
    empty_message: String,
    per_page_options: Vec<usize>,
}

/// Sink used when the builder is not given one: a browser download.
#[cfg(target_arch = "wasm32")]
fn default_sink() -> Box<dyn FileSink> {
    Box::new(crate::dom::DownloadSink)
}

/// Sink used when the builder is not given one: the working directory.
#[cfg(not(target_arch = "wasm32"))]
fn default_sink() -> Box<dyn FileSink> {
    Box::new(crate::host::DirectorySink::new("."))
}

/// Configures and builds a [`TableController`].
///
/// Exports are downloaded by the browser on wasm32 and written to the working
/// directory elsewhere, unless [`sink`](Self::sink) says otherwise.
pub struct TableBuilder {
    table: Table,
    per_page: usize,
    debounce_ms: f64,
    options: TableOptions,
    sink: Box<dyn FileSink>,
    notifier: Box<dyn Notifier>,
    spreadsheet: Option<Box<dyn SpreadsheetWriter>>,
    clock: Clock,
    extensions: Vec<Rc<dyn TableExtension>>,
}

impl TableBuilder {
    fn new(table: Table) -> Self {
        Self {
            table,
            per_page: DEFAULT_PER_PAGE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            options: TableOptions {
                ordinal_label: DEFAULT_ORDINAL_LABEL.to_string(),
                empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
                per_page_options: DEFAULT_PER_PAGE_OPTIONS.to_vec(),
            },
            sink: default_sink(),
            notifier: Box::new(LogNotifier),
            spreadsheet: Some(Box::new(XlsxWriter::new())),
            clock: Box::new(Utc::now),
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Quiet window for [`TableController::search_input`].
    #[must_use]
    pub fn debounce_ms(mut self, wait_ms: f64) -> Self {
        self.debounce_ms = wait_ms;
        self
    }

    #[must_use]
    pub fn ordinal_label(mut self, label: impl Into<String>) -> Self {
        self.options.ordinal_label = label.into();
        self
    }

    #[must_use]
    pub fn per_page_options(mut self, options: Vec<usize>) -> Self {
        self.options.per_page_options = options;
        self
    }

    #[must_use]
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.options.empty_message = message.into();
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: impl FileSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Replace (or with `None`, remove) the spreadsheet writer.
    #[must_use]
    pub fn spreadsheet_writer(mut self, writer: Option<Box<dyn SpreadsheetWriter>>) -> Self {
        self.spreadsheet = writer;
        self
    }

    /// Clock used for export timestamps.
    #[must_use]
    pub fn clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Register an extension. Extensions run in registration order.
    #[must_use]
    pub fn extension(mut self, extension: impl TableExtension + 'static) -> Self {
        self.extensions.push(Rc::new(extension));
        self
    }

    /// Build the controller, create its controls, and perform the initial render.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidInput`] when `per_page` is zero.
    pub fn build(self) -> Result<TableController> {
        if self.per_page == 0 {
            return Err(TableError::InvalidInput(
                "per_page must be at least 1".to_string(),
            ));
        }

        let filtered = self.table.rows().to_vec();
        let mut controller = TableController {
            table: self.table,
            view: ViewState::new(self.per_page),
            filtered,
            selection: SelectionState::new(),
            controls: ControlSet::base(self.per_page, &[]),
            search_debounce: Debounce::new(self.debounce_ms),
            options: self.options,
            sink: self.sink,
            notifier: self.notifier,
            spreadsheet: self.spreadsheet,
            clock: self.clock,
            extensions: self.extensions,
        };
        controller.create_controls();
        log::debug!(
            "table controller built: {} rows, {} columns, per_page {}",
            controller.table.rows().len(),
            controller.table.column_count(),
            controller.view.per_page
        );
        controller.render();
        Ok(controller)
    }
}

/// The table state machine: search, sort, pagination, selection, export.
pub struct TableController {
    table: Table,
    view: ViewState,
    filtered: Vec<Row>,
    selection: SelectionState,
    controls: ControlSet,
    search_debounce: Debounce<String>,
    options: TableOptions,
    sink: Box<dyn FileSink>,
    notifier: Box<dyn Notifier>,
    spreadsheet: Option<Box<dyn SpreadsheetWriter>>,
    clock: Clock,
    extensions: Vec<Rc<dyn TableExtension>>,
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("view", &self.view)
            .field("rows", &self.table.rows().len())
            .field("filtered", &self.filtered.len())
            .field("extensions", &self.extension_names())
            .finish_non_exhaustive()
    }
}

impl TableController {
    /// Controller with default options.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidInput`] when `per_page` is zero.
    pub fn new(table: Table, per_page: usize) -> Result<Self> {
        Self::builder(table).per_page(per_page).build()
    }

    pub fn builder(table: Table) -> TableBuilder {
        TableBuilder::new(table)
    }

    /// Read a `<table>` from markup and build a controller with default options.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidInput`] when the markup holds no table or
    /// `per_page` is zero.
    pub fn from_markup(markup: &str, per_page: usize) -> Result<Self> {
        Self::new(markup::parse_table(markup)?, per_page)
    }

    /// Build the base control surface, then let each extension amend it.
    fn create_controls(&mut self) {
        self.controls = ControlSet::base(self.view.per_page, &self.options.per_page_options);
        for extension in self.extensions.clone() {
            extension.create_controls(&mut self.controls);
            log::debug!("extension '{}' created its controls", extension.name());
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    /// Rows matching the search term, in display order.
    pub fn filtered_rows(&self) -> &[Row] {
        &self.filtered
    }

    /// The current page slice of [`filtered_rows`](Self::filtered_rows).
    pub fn visible_rows(&self) -> &[Row] {
        let (start, end) = page_range(self.view.page, self.view.per_page, self.filtered.len());
        self.filtered.get(start..end).unwrap_or(&[])
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn page(&self) -> usize {
        self.view.page
    }

    pub fn per_page(&self) -> usize {
        self.view.per_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.view.per_page)
    }

    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn ordinal_label(&self) -> &str {
        &self.options.ordinal_label
    }

    pub fn extension_names(&self) -> Vec<String> {
        self.extensions.iter().map(|e| e.name().to_string()).collect()
    }

    /// Number of filtered rows whose checkbox is checked.
    pub fn selected_count(&self) -> usize {
        self.filtered
            .iter()
            .filter(|row| row.checkbox().is_some_and(|cb| cb.is_checked()))
            .count()
    }

    // ---- search ----------------------------------------------------------

    /// Filter rows by case-insensitive substring over their text content.
    ///
    /// Re-applies the active sort and goes back to page 1.
    pub fn set_search(&mut self, term: &str) {
        self.controls.search_value = term.to_string();
        self.view.search_term = term.trim().to_lowercase();
        self.apply_search();
        self.view.page = 1;
        log::debug!(
            "search '{}' matched {} of {} rows",
            self.view.search_term,
            self.filtered.len(),
            self.table.rows().len()
        );
        self.render();
    }

    fn apply_search(&mut self) {
        let term = &self.view.search_term;
        self.filtered = self
            .table
            .rows()
            .iter()
            .filter(|row| term.is_empty() || row.text_content().to_lowercase().contains(term))
            .cloned()
            .collect();
        self.apply_sort();
    }

    /// Record a keystroke. The search runs once input has been idle for the
    /// debounce window (see [`poll_search`](Self::poll_search)).
    pub fn search_input(&mut self, term: &str, now_ms: f64) {
        self.search_debounce.trigger(term.to_string(), now_ms);
    }

    /// Run the pending search if its window has elapsed. Returns whether it ran.
    pub fn poll_search(&mut self, now_ms: f64) -> bool {
        match self.search_debounce.poll(now_ms) {
            Some(term) => {
                self.set_search(&term);
                true
            }
            None => false,
        }
    }

    /// Milliseconds until the pending search fires.
    pub fn search_pending_ms(&self, now_ms: f64) -> Option<f64> {
        self.search_debounce.remaining_ms(now_ms)
    }

    /// Whether a debounced search is waiting to run.
    pub fn search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    pub fn search_debounce_ms(&self) -> f64 {
        self.search_debounce.wait_ms()
    }

    // ---- sorting ---------------------------------------------------------

    /// Sort by `column`: the same column toggles direction, a new one starts
    /// ascending. Headers carrying a control and out-of-range indices are ignored.
    pub fn handle_sort(&mut self, column: usize) {
        if !self.table.header(column).is_some_and(|h| h.is_sortable()) {
            log::debug!("ignoring sort request for column {column}");
            return;
        }

        if self.view.sort_column == Some(column) {
            self.view.sort_direction = self.view.sort_direction.toggled();
        } else {
            self.view.sort_column = Some(column);
            self.view.sort_direction = SortDirection::Asc;
        }

        for (index, header) in self.table.headers().iter().enumerate() {
            let marker = (index == column).then_some(self.view.sort_direction);
            header.set_sort_marker(marker);
        }

        self.apply_sort();
        log::debug!("sorted column {column} {:?}", self.view.sort_direction);
        self.render();
    }

    fn apply_sort(&mut self) {
        if let Some(column) = self.view.sort_column {
            sort_rows(&mut self.filtered, column, self.view.sort_direction);
        }
    }

    // ---- pagination ------------------------------------------------------

    /// Change the page size and go back to page 1.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidInput`] when `per_page` is zero.
    pub fn set_per_page(&mut self, per_page: usize) -> Result<()> {
        if per_page == 0 {
            return Err(TableError::InvalidInput(
                "per_page must be at least 1".to_string(),
            ));
        }
        self.view.per_page = per_page;
        self.view.page = 1;
        self.controls.per_page = per_page;
        if !self.controls.per_page_options.contains(&per_page) {
            self.controls.per_page_options.push(per_page);
            self.controls.per_page_options.sort_unstable();
        }
        self.render();
        Ok(())
    }

    /// Jump to `page`, clamped into the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.view.page = clamp_page(page, self.filtered.len(), self.view.per_page);
        self.render();
    }

    pub fn prev_page(&mut self) {
        if self.view.page > 1 {
            self.view.page -= 1;
            self.render();
        }
    }

    pub fn next_page(&mut self) {
        if self.view.page < self.total_pages() {
            self.view.page += 1;
            self.render();
        }
    }

    /// Activate a pagination button.
    pub fn press_page_button(&mut self, kind: PageButtonKind) {
        match kind {
            PageButtonKind::Prev => self.prev_page(),
            PageButtonKind::Next => self.next_page(),
            PageButtonKind::Page(page) => self.go_to_page(page),
            PageButtonKind::Ellipsis => {}
        }
    }

    // ---- selection -------------------------------------------------------

    /// Check or uncheck a body checkbox and remember its state.
    pub fn set_checkbox(&mut self, checkbox: &Rc<Checkbox>, checked: bool) {
        checkbox.set_checked(checked);
        self.selection.set(checkbox, checked);
        self.update_selection_counter();
    }

    /// Check or uncheck every checkbox on the current page only.
    pub fn toggle_select_all(&mut self, checked: bool) {
        let checkboxes: Vec<Rc<Checkbox>> =
            self.visible_rows().iter().filter_map(Row::checkbox).collect();
        for checkbox in &checkboxes {
            checkbox.set_checked(checked);
            self.selection.set(checkbox, checked);
        }
        log::debug!(
            "select-all {} on page {} ({} checkboxes)",
            if checked { "checked" } else { "cleared" },
            self.view.page,
            checkboxes.len()
        );
        self.update_selection_counter();
        self.update_select_all();
    }

    // ---- data lifecycle --------------------------------------------------

    /// Replace every row, clear the search, and go back to page 1.
    ///
    /// An active sort is re-applied to the new rows.
    ///
    /// # Errors
    /// Returns [`TableError::Markup`] when a markup source cannot be read.
    pub fn update_data(&mut self, source: RowSource) -> Result<()> {
        let rows = match source {
            RowSource::Rows(rows) => rows,
            RowSource::Markup(html) => markup::parse_rows(&html)?,
        };
        log::debug!("replacing {} rows with {}", self.table.rows().len(), rows.len());
        self.table.replace_rows(rows);
        self.search_debounce.cancel();
        self.view.search_term.clear();
        self.controls.search_value.clear();
        self.selection.purge();
        self.apply_search();
        self.view.page = 1;
        self.render();
        Ok(())
    }

    /// Tear the widget down and hand back the bare table: placeholder gone,
    /// every row visible, no sort markers.
    pub fn destroy(mut self) -> Table {
        self.table.remove_placeholder();
        for row in self.table.rows() {
            row.set_hidden(false);
        }
        for header in self.table.headers() {
            header.set_sort_marker(None);
        }
        log::debug!("table controller destroyed");
        self.table
    }

    // ---- actions ---------------------------------------------------------

    /// Run the action behind a control.
    ///
    /// Base actions are handled here; custom actions go to the first extension
    /// that claims them. Unclaimed custom actions are logged and ignored.
    ///
    /// # Errors
    /// Propagates sink and writer errors from the export that ran.
    pub fn trigger(&mut self, action: &Action) -> Result<Option<ExportOutcome>> {
        match action {
            Action::ExportCsv => self.export_to_csv().map(Some),
            Action::ExportExcel => self.export_to_excel().map(Some),
            Action::Custom(id) => {
                for extension in self.extensions.clone() {
                    if let Some(outcome) = extension.handle_action(self, action)? {
                        return Ok(Some(outcome));
                    }
                }
                log::warn!("no extension handles action '{id}'");
                Ok(None)
            }
        }
    }

    // ---- host ------------------------------------------------------------

    /// Show a warning to the user.
    pub fn warn(&self, message: &str) {
        self.notifier.warn(message);
    }

    /// Show an informational message to the user.
    pub fn inform(&self, message: &str) {
        self.notifier.inform(message);
    }

    /// Hand a file to the host for saving.
    ///
    /// # Errors
    /// Propagates the sink's error.
    pub fn download_file(&mut self, content: &[u8], filename: &str, mime_type: &str) -> Result<()> {
        log::debug!("saving {filename} ({} bytes, {mime_type})", content.len());
        self.sink.save(content, filename, mime_type)
    }

    /// The current instant, from the configured clock.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{ColumnHeader, TableCell};

    fn numbered(count: usize) -> Table {
        let headers = vec![ColumnHeader::new("Name"), ColumnHeader::new("Age")];
        let rows = (1..=count)
            .map(|i| Row::from_texts([format!("Person {i}"), (20 + i).to_string()]))
            .collect();
        Table::new(headers, rows)
    }

    #[test]
    fn test_zero_per_page_is_rejected() {
        let err = TableController::new(numbered(3), 0).unwrap_err();
        assert!(matches!(err, TableError::InvalidInput(_)));
    }

    #[test]
    fn test_initial_render_shows_first_page() {
        let table = TableController::new(numbered(12), 10).unwrap();
        assert_eq!(table.visible_rows().len(), 10);
        let hidden = table.rows().iter().filter(|r| r.is_hidden()).count();
        assert_eq!(hidden, 2);
    }

    #[test]
    fn test_search_resets_page() {
        let mut table = TableController::new(numbered(12), 5).unwrap();
        table.go_to_page(3);
        assert_eq!(table.page(), 3);
        table.set_search("  PERSON 1 ");
        // Person 1, 10, 11, 12
        assert_eq!(table.filtered_rows().len(), 4);
        assert_eq!(table.page(), 1);
        table.set_search("");
        assert_eq!(table.filtered_rows().len(), 12);
    }

    #[test]
    fn test_sort_toggle_and_markers() {
        let mut table = TableController::new(numbered(3), 10).unwrap();
        table.handle_sort(1);
        assert_eq!(table.view_state().sort_direction, SortDirection::Asc);
        table.handle_sort(1);
        assert_eq!(table.view_state().sort_direction, SortDirection::Desc);
        assert_eq!(table.filtered_rows()[0].cell(1).unwrap().text_content(), "23");

        table.handle_sort(0);
        assert_eq!(table.view_state().sort_column, Some(0));
        assert_eq!(table.view_state().sort_direction, SortDirection::Asc);
        assert_eq!(table.table().headers()[1].sort_marker(), None);
        assert_eq!(table.table().headers()[0].sort_marker(), Some(SortDirection::Asc));
    }

    #[test]
    fn test_sort_ignores_unsortable_and_out_of_range() {
        let cb = Checkbox::new(None, false);
        let headers = vec![ColumnHeader::select_all(cb), ColumnHeader::new("Name")];
        let rows = vec![Row::new(vec![TableCell::text(""), TableCell::text("b")])];
        let mut table = TableController::new(Table::new(headers, rows), 10).unwrap();
        table.handle_sort(0);
        table.handle_sort(9);
        assert_eq!(table.view_state().sort_column, None);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut table = TableController::new(numbered(12), 5).unwrap();
        table.prev_page();
        assert_eq!(table.page(), 1);
        table.go_to_page(99);
        assert_eq!(table.page(), 3);
        table.next_page();
        assert_eq!(table.page(), 3);
        table.press_page_button(PageButtonKind::Prev);
        assert_eq!(table.page(), 2);
        table.go_to_page(0);
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_set_per_page_resets_and_validates() {
        let mut table = TableController::new(numbered(12), 5).unwrap();
        table.go_to_page(2);
        table.set_per_page(7).unwrap();
        assert_eq!(table.page(), 1);
        assert!(table.controls().per_page_options.contains(&7));
        assert_eq!(table.controls().per_page_labels(), ["5", "7", "10", "20", "50", "100"]);
        assert!(table.set_per_page(0).is_err());
        assert_eq!(table.per_page(), 7);
    }

    #[test]
    fn test_debounced_search() {
        let mut table = TableController::builder(numbered(12))
            .debounce_ms(300.0)
            .build()
            .unwrap();
        table.search_input("Person 1", 0.0);
        table.search_input("Person 2", 100.0);
        assert!(!table.poll_search(350.0));
        assert_eq!(table.filtered_rows().len(), 12);
        assert!(table.poll_search(400.0));
        assert_eq!(table.filtered_rows().len(), 1);
        assert_eq!(table.controls().search_value, "Person 2");
    }

    #[test]
    fn test_destroy_restores_rows() {
        let mut table = TableController::new(numbered(12), 5).unwrap();
        table.handle_sort(0);
        table.set_search("nobody");
        let bare = table.destroy();
        assert!(bare.placeholder().is_none());
        assert!(bare.rows().iter().all(|r| !r.is_hidden()));
        assert!(bare.headers().iter().all(|h| h.sort_marker().is_none()));
    }
}
