//! simpletable - search, sort, pagination, row selection, and export for HTML tables
//!
//! The crate has two layers:
//! - a headless core ([`TableController`] and friends) that owns the row
//!   snapshot, the view/selection state machine, extensions, and exporters;
//! - a DOM binding (`wasm32` only) that reads a live `<table>`, wires the
//!   browser events, and mirrors the core state back into the page.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableWidget, initAll } from 'simpletable';
//! await init();
//! initAll();                                   // every table.simpletable
//! const widget = new TableWidget(document.querySelector('#users'), 20);
//! widget.exportToCsv();
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use simpletable::{SelectionExport, SelectionExportExtension, TableController, markup};
//!
//! let html = r#"<table><thead><tr><th><input type="checkbox"></th><th>Name</th></tr></thead>
//!   <tbody><tr><td><input type="checkbox" value="7" checked></td><td>Ann</td></tr></tbody></table>"#;
//! let table = TableController::builder(markup::parse_table(html)?)
//!     .extension(SelectionExportExtension::new())
//!     .build()?;
//! assert_eq!(table.selected_ids(), ["7"]);
//! # Ok::<(), simpletable::TableError>(())
//! ```

// Core model and state machine
pub mod controller;
pub mod controls;
pub mod debounce;
pub mod error;
pub mod extension;
pub mod pagination;
pub mod selection;
pub mod sort;
pub mod types;

// Input and output
pub mod export;
pub mod export_selected;
pub mod host;
pub mod markup;

// Browser binding
#[cfg(target_arch = "wasm32")]
pub mod dom;

use wasm_bindgen::prelude::*;

pub use controller::{RowSource, TableBuilder, TableController};
pub use controls::{Action, ControlButton, ControlSet};
pub use error::{Result, TableError};
pub use export::SpreadsheetWriter;
pub use export_selected::{SelectionExport, SelectionExportExtension};
pub use extension::TableExtension;
pub use host::{FileSink, Notifier};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use dom::TableWidget;

/// Read table markup and return its rows as CSV text.
///
/// # Errors
/// Returns an error if the markup holds no readable `<table>`.
#[wasm_bindgen(js_name = tableToCsv)]
pub fn table_to_csv(markup: &str) -> std::result::Result<String, JsValue> {
    let controller =
        TableController::from_markup(markup, 10).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(controller.convert_to_csv(&controller.export_data(None)))
}

/// Read table markup and return the export records as a JSON string.
///
/// # Errors
/// Returns an error if the markup holds no readable `<table>`.
#[wasm_bindgen(js_name = tableToJson)]
pub fn table_to_json(markup: &str) -> std::result::Result<String, JsValue> {
    let controller =
        TableController::from_markup(markup, 10).map_err(|e| JsValue::from_str(&e.to_string()))?;
    controller
        .export_json(false)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
