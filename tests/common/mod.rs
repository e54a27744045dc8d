//! Common test utilities and assertion helpers.
//!
//! Builds controllers over fixture markup with an in-memory file sink, a
//! recording notifier, and a fixed clock, so exports can be inspected.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use chrono::{DateTime, TimeZone, Utc};
use simpletable::host::{MemorySink, RecordingNotifier};
use simpletable::{markup, Row, SelectionExportExtension, TableController};

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Clock used by every harness: 2024-05-06 07:08:09 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
}

pub const FIXED_TS: &str = "2024-05-06T07-08-09";

/// A controller plus handles on its host collaborators.
pub struct Harness {
    pub table: TableController,
    pub sink: MemorySink,
    pub notifier: RecordingNotifier,
}

/// Build a harness over `html` with the selection-export extension installed.
pub fn harness(html: &str, per_page: usize) -> Harness {
    let sink = MemorySink::new();
    let notifier = RecordingNotifier::new();
    let table = TableController::builder(markup::parse_table(html).expect("fixture markup"))
        .per_page(per_page)
        .sink(sink.clone())
        .notifier(notifier.clone())
        .clock(fixed_now)
        .extension(SelectionExportExtension::new())
        .build()
        .expect("controller");
    Harness {
        table,
        sink,
        notifier,
    }
}

/// Text of column `column` for each row.
pub fn column_texts(rows: &[Row], column: usize) -> Vec<String> {
    rows.iter()
        .map(|r| r.cell(column).map(|c| c.export_text()).unwrap_or_default())
        .collect()
}

/// Labels of the pagination buttons between Prev and Next.
pub fn page_labels(table: &TableController) -> Vec<String> {
    let buttons = &table.controls().pagination;
    if buttons.len() < 2 {
        return Vec::new();
    }
    buttons[1..buttons.len() - 1]
        .iter()
        .map(|b| b.label.clone())
        .collect()
}

pub fn assert_info(table: &TableController, expected: &str) {
    assert_eq!(table.controls().info, expected, "info text");
}
