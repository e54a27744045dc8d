//! Generates worksheet XML from [`ExportData`].
//!
//! Every cell is written as an inline string (`t="inlineStr"`), so the
//! workbook needs no shared string table.

use crate::types::ExportData;

/// Write a complete worksheet XML string: one header row, then one row per record.
pub(crate) fn write_sheet_xml(data: &ExportData) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    let col_count = data.headers.len();
    if col_count > 0 {
        let end_col = col_to_letter(col_count - 1);
        let end_row = data.rows.len() + 1;
        out.push_str(&format!("<dimension ref=\"A1:{end_col}{end_row}\"/>\n"));
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    if col_count > 0 {
        write_row(&mut out, 0, data.headers.iter().map(String::as_str));
        for (idx, row) in data.rows.iter().enumerate() {
            let values = data
                .headers
                .iter()
                .map(|h| row.get(h).map(String::as_str).unwrap_or(""));
            write_row(&mut out, idx + 1, values);
        }
    }
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

/// Write a single `<row>`; empty values are skipped like Excel does.
fn write_row<'a>(out: &mut String, row: usize, values: impl Iterator<Item = &'a str>) {
    out.push_str(&format!("<row r=\"{}\">", row + 1));
    for (col, value) in values.enumerate() {
        if value.is_empty() {
            continue;
        }
        write_cell(out, row, col, value);
    }
    out.push_str("</row>\n");
}

/// Write a single inline-string `<c>` element.
fn write_cell(out: &mut String, row: usize, col: usize, value: &str) {
    let cell_ref = format!("{}{}", col_to_letter(col), row + 1);
    out.push_str(&format!("<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t"));
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        out.push_str(" xml:space=\"preserve\"");
    }
    out.push('>');
    out.push_str(&xml_escape(value));
    out.push_str("</t></is></c>");
}

/// Convert a 0-based column index to spreadsheet letters (A, B, ..., Z, AA, ...).
pub(crate) fn col_to_letter(col: usize) -> String {
    let mut result = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.push(char::from(b'A' + offset));
        n /= 26;
    }
    result.iter().rev().collect()
}

/// Minimal XML escaping for attribute/text content.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::ExportRow;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
    }

    #[test]
    fn test_sheet_xml_contains_header_and_values() {
        let mut row = ExportRow::new();
        row.insert("Name".into(), "Tom & Jerry".into());
        row.insert("Age".into(), String::new());
        let data = ExportData {
            headers: vec!["Name".into(), "Age".into()],
            rows: vec![row],
        };
        let xml = write_sheet_xml(&data);
        assert!(xml.contains("<dimension ref=\"A1:B2\"/>"));
        assert!(xml.contains("<c r=\"A1\" t=\"inlineStr\"><is><t>Name</t></is></c>"));
        assert!(xml.contains("<c r=\"A2\" t=\"inlineStr\"><is><t>Tom &amp; Jerry</t></is></c>"));
        // Empty values produce no cell
        assert!(!xml.contains("r=\"B2\""));
    }

    #[test]
    fn test_preserves_edge_whitespace() {
        let mut out = String::new();
        write_cell(&mut out, 0, 0, " padded");
        assert!(out.contains("xml:space=\"preserve\""));
    }
}
