use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One exported record: field name to trimmed cell text, in column order.
pub type ExportRow = IndexMap<String, String>;

/// Neutral tabular snapshot handed to the serializers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportData {
    pub headers: Vec<String>,
    pub rows: Vec<ExportRow>,
}

impl ExportData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// What an export action ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A file was handed to the sink.
    Saved { filename: String, rows: usize },
    /// The spreadsheet writer was unavailable; a CSV was saved instead.
    FellBackToCsv { filename: String, rows: usize },
    /// Export-selected was requested with no checked rows; nothing was saved.
    NothingSelected,
}

impl ExportOutcome {
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Saved { filename, .. } | Self::FellBackToCsv { filename, .. } => Some(filename),
            Self::NothingSelected => None,
        }
    }
}
