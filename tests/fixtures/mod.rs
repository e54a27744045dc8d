//! Test fixtures for generating table markup in memory.
//!
//! This module provides a builder for HTML tables shaped the way the widget
//! expects them: an optional selection column, an optional ordinal column,
//! data columns, and an optional `no-export` actions column.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::TableFixture;
//!
//! let html = TableFixture::new(&["Name", "Age"])
//!     .selectable()
//!     .numbered()
//!     .row(&["Alice", "31"])
//!     .row(&["Bob", "27"])
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug, Clone, Default)]
pub struct TableFixture {
    columns: Vec<String>,
    selectable: bool,
    numbered: bool,
    actions: bool,
    rows: Vec<Vec<String>>,
    /// Checkbox value per row; `None` leaves the attribute off.
    values: Vec<Option<String>>,
    checked: Vec<bool>,
}

impl TableFixture {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Leading checkbox column with a select-all header.
    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    /// Ordinal `No` column with `row-number` cells.
    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    /// Trailing `no-export` column with an Edit button per row.
    pub fn with_actions(mut self) -> Self {
        self.actions = true;
        self
    }

    pub fn row(self, cells: &[&str]) -> Self {
        let value = Some((self.rows.len() + 1).to_string());
        self.row_with(cells, value.as_deref(), false)
    }

    pub fn row_with(mut self, cells: &[&str], value: Option<&str>, checked: bool) -> Self {
        self.rows.push(cells.iter().map(|c| (*c).to_string()).collect());
        self.values.push(value.map(str::to_string));
        self.checked.push(checked);
        self
    }

    /// `count` rows of `Person i` / `20 + i`.
    pub fn people(mut self, count: usize) -> Self {
        for i in 1..=count {
            let name = format!("Person {i}");
            let age = (20 + i).to_string();
            self = self.row(&[&name, &age]);
        }
        self
    }

    fn header_html(&self) -> String {
        let mut out = String::from("<thead><tr>");
        if self.selectable {
            out.push_str("<th><input type=\"checkbox\"></th>");
        }
        if self.numbered {
            out.push_str("<th>No</th>");
        }
        for column in &self.columns {
            out.push_str(&format!("<th>{}</th>", escape(column)));
        }
        if self.actions {
            out.push_str("<th class=\"no-export\">Actions</th>");
        }
        out.push_str("</tr></thead>");
        out
    }

    /// Only the `<tr>` elements, for `update_data`.
    pub fn rows_html(&self) -> String {
        let mut out = String::new();
        for (i, cells) in self.rows.iter().enumerate() {
            out.push_str("<tr>");
            if self.selectable {
                let value = self.values[i]
                    .as_ref()
                    .map(|v| format!(" value=\"{}\"", escape(v)))
                    .unwrap_or_default();
                let checked = if self.checked[i] { " checked" } else { "" };
                out.push_str(&format!("<td><input type=\"checkbox\"{value}{checked}></td>"));
            }
            if self.numbered {
                out.push_str(&format!("<td class=\"row-number\">{}</td>", i + 1));
            }
            for cell in cells {
                out.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            if self.actions {
                out.push_str("<td><button>Edit</button></td>");
            }
            out.push_str("</tr>");
        }
        out
    }

    pub fn build(&self) -> String {
        format!(
            "<table class=\"simpletable\">{}<tbody>{}</tbody></table>",
            self.header_html(),
            self.rows_html()
        )
    }
}
