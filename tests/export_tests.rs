//! Export tests: CSV content and escaping, filenames, spreadsheet output,
//! and the CSV fallback when no spreadsheet writer is installed.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use std::io::{Cursor, Read};
use std::path::Path;

use chrono::{TimeZone, Utc};

use common::*;
use simpletable::export::parse_csv;
use simpletable::host::{MemorySink, RecordingNotifier, CSV_MIME, XLSX_MIME};
use simpletable::{markup, Action, ExportOutcome, TableController};
use zip::ZipArchive;

fn sheet_xml(bytes: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name("xl/worksheets/sheet1.xml").unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn test_csv_quotes_commas_and_doubles_quotes() {
    let html = TableFixture::new(&["Name"])
        .row(&["Smith, J. \"Jr.\""])
        .build();
    let mut h = harness(&html, 10);
    h.table.export_to_csv().unwrap();

    let saved = h.sink.last().unwrap();
    assert_eq!(saved.text(), "Name\n\"Smith, J. \"\"Jr.\"\"\"");
}

#[test]
fn test_csv_excludes_control_columns() {
    let html = TableFixture::new(&["Name", "Age"])
        .selectable()
        .numbered()
        .with_actions()
        .row(&["Alice", "31"])
        .row(&["Bob", "27"])
        .build();
    let mut h = harness(&html, 10);

    assert_eq!(h.table.table_headers(), ["Name", "Age"]);
    let outcome = h.table.export_to_csv().unwrap();
    assert_eq!(
        outcome,
        ExportOutcome::Saved {
            filename: format!("table-export-{FIXED_TS}.csv"),
            rows: 2,
        }
    );

    let saved = h.sink.last().unwrap();
    assert_eq!(saved.mime_type, CSV_MIME);
    assert_eq!(saved.text(), "Name,Age\nAlice,31\nBob,27");
}

#[test]
fn test_csv_follows_filter_and_sort_not_page() {
    let html = TableFixture::new(&["Name", "Age"]).people(30).build();
    let mut h = harness(&html, 5);
    h.table.set_search("person 2");
    h.table.handle_sort(1);
    h.table.handle_sort(1);
    h.table.export_to_csv().unwrap();

    let data = parse_csv(&h.sink.last().unwrap().text());
    // Person 2 and 20..29, all pages, in descending age order
    assert_eq!(data.len(), 11);
    assert_eq!(data.rows[0]["Name"], "Person 29");
    assert_eq!(data.rows[10]["Name"], "Person 2");
}

#[test]
fn test_export_strips_buttons_and_trims() {
    let html = "<table><thead><tr><th>Name</th></tr></thead><tbody>\
                <tr><td>  Ann <button>Edit</button> </td></tr></tbody></table>";
    let h = harness(html, 10);
    let data = h.table.export_data(None);
    assert_eq!(data.rows[0]["Name"], "Ann");
    // Button labels still count for search
    assert!(h.table.rows()[0].text_content().contains("Edit"));
}

#[test]
fn test_csv_round_trip_preserves_records() {
    let html = TableFixture::new(&["Name", "Note"])
        .row(&["Ann", "likes \"tea\", mostly"])
        .row(&["Bo", "multi\nline"])
        .row(&["Cy", ""])
        .build();
    let mut h = harness(&html, 10);
    let original = h.table.export_data(None);
    h.table.export_to_csv().unwrap();

    let parsed = parse_csv(&h.sink.last().unwrap().text());
    assert_eq!(parsed, original);
}

#[test]
fn test_empty_export_writes_empty_file() {
    let html = TableFixture::new(&["Name"]).people(3).build();
    let mut h = harness(&html, 10);
    h.table.set_search("nobody");
    let outcome = h.table.export_to_csv().unwrap();
    assert_eq!(outcome.filename(), Some(format!("table-export-{FIXED_TS}.csv").as_str()));
    assert_eq!(h.sink.last().unwrap().text(), "");
}

#[test]
fn test_excel_export_builds_workbook() {
    let html = TableFixture::new(&["City", "Pop"])
        .row(&["Oslo", "709000"])
        .row(&["Bergen & Co", "291000"])
        .build();
    let mut h = harness(&html, 10);
    let outcome = h.table.export_to_excel().unwrap();
    assert_eq!(outcome.filename(), Some(format!("table-export-{FIXED_TS}.xlsx").as_str()));

    let saved = h.sink.last().unwrap();
    assert_eq!(saved.mime_type, XLSX_MIME);
    let xml = sheet_xml(&saved.content);
    assert!(xml.contains("<t>City</t>"));
    assert!(xml.contains("<t>Oslo</t>"));
    assert!(xml.contains("Bergen &amp; Co"));
    assert!(h.notifier.warnings().is_empty());
}

#[test]
fn test_excel_falls_back_to_csv_without_writer() {
    let html = TableFixture::new(&["Name"]).people(2).build();
    let sink = MemorySink::new();
    let notifier = RecordingNotifier::new();
    let mut table = TableController::builder(markup::parse_table(&html).unwrap())
        .sink(sink.clone())
        .notifier(notifier.clone())
        .clock(fixed_now)
        .spreadsheet_writer(None)
        .build()
        .unwrap();

    let outcome = table.export_to_excel().unwrap();
    assert_eq!(
        outcome,
        ExportOutcome::FellBackToCsv {
            filename: format!("table-export-{FIXED_TS}.csv"),
            rows: 2,
        }
    );
    assert_eq!(
        notifier.warnings(),
        ["Excel export requires a spreadsheet writer. Falling back to CSV."]
    );
    let saved = sink.last().unwrap();
    assert_eq!(saved.mime_type, CSV_MIME);
    assert_eq!(saved.text(), "Name\nPerson 1\nPerson 2");
}

#[test]
fn test_trigger_routes_base_actions() {
    let html = TableFixture::new(&["Name"]).people(1).build();
    let mut h = harness(&html, 10);

    let csv = h.table.trigger(&Action::ExportCsv).unwrap().unwrap();
    assert!(csv.filename().unwrap().ends_with(".csv"));
    let xlsx = h.table.trigger(&Action::ExportExcel).unwrap().unwrap();
    assert!(xlsx.filename().unwrap().ends_with(".xlsx"));
    assert_eq!(h.sink.len(), 2);

    assert_eq!(h.table.trigger(&Action::custom("unknown")).unwrap(), None);
    assert_eq!(h.sink.len(), 2);
}

#[test]
fn test_json_export_keeps_column_order() {
    let html = TableFixture::new(&["Zeta", "Alpha"]).row(&["1", "2"]).build();
    let h = harness(&html, 10);
    assert_eq!(h.table.export_json(false).unwrap(), r#"[{"Zeta":"1","Alpha":"2"}]"#);
    assert!(h.table.export_json(true).unwrap().contains("\n    \"Zeta\": \"1\""));
}

#[test]
fn test_default_sink_writes_to_working_directory() {
    let html = TableFixture::new(&["Name"]).people(2).build();
    let mut table = TableController::builder(markup::parse_table(&html).unwrap())
        .clock(|| Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap())
        .build()
        .unwrap();

    let outcome = table.export_to_csv().unwrap();
    let filename = outcome.filename().unwrap().to_string();
    assert_eq!(filename, "table-export-1999-12-31T23-59-58.csv");

    let path = Path::new(&filename);
    let written = std::fs::read_to_string(path);
    let _ = std::fs::remove_file(path);
    assert_eq!(written.unwrap(), "Name\nPerson 1\nPerson 2");
}
