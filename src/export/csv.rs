//! Delimited-text serialization of [`ExportData`], and the matching reader.

use crate::types::{ExportData, ExportRow};

/// Field separator for exported CSV.
pub const DELIMITER: char = ',';

/// Quote a field if it contains the delimiter, a quote, or a line break.
/// Embedded quotes are doubled.
pub fn escape_field(value: &str) -> String {
    let needs_quoting = value.contains(DELIMITER)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');

    if needs_quoting {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Serialize export data to CSV text.
///
/// Empty data yields an empty string. Otherwise the first line holds the
/// header names and each following line one record; fields a record lacks
/// are written empty.
pub fn convert_to_csv(data: &ExportData) -> String {
    if data.rows.is_empty() {
        return String::new();
    }

    let sep = DELIMITER.to_string();
    let mut lines = Vec::with_capacity(data.rows.len() + 1);
    lines.push(
        data.headers
            .iter()
            .map(|h| escape_field(h))
            .collect::<Vec<_>>()
            .join(&sep),
    );
    for row in &data.rows {
        lines.push(
            data.headers
                .iter()
                .map(|h| escape_field(row.get(h).map(String::as_str).unwrap_or("")))
                .collect::<Vec<_>>()
                .join(&sep),
        );
    }
    lines.join("\n")
}

/// Parse CSV text produced by [`convert_to_csv`] back into export data.
pub fn parse_csv(text: &str) -> ExportData {
    let records = split_records(text);
    let mut records = records.into_iter();
    let Some(headers) = records.next() else {
        return ExportData::default();
    };
    let rows = records
        .map(|fields| {
            headers
                .iter()
                .cloned()
                .zip(fields.into_iter().chain(std::iter::repeat(String::new())))
                .collect::<ExportRow>()
        })
        .collect();
    ExportData { headers, rows }
}

/// Split CSV text into records, respecting quoted fields that may span lines.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut saw_any = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        saw_any = true;
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == DELIMITER {
            fields.push(std::mem::take(&mut current));
        } else if ch == '\n' {
            fields.push(std::mem::take(&mut current));
            records.push(std::mem::take(&mut fields));
        } else if ch != '\r' {
            current.push(ch);
        }
    }
    if saw_any && !(fields.is_empty() && current.is_empty() && text.ends_with('\n')) {
        fields.push(current);
        records.push(fields);
    }
    records
}
