//! Structured error types for simpletable.

/// All errors that can occur while building, rendering, or exporting a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Missing table handle, missing body, or an unusable argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Table markup could not be read.
    #[error("Markup parsing: {0}")]
    Markup(#[from] quick_xml::Error),

    /// ZIP archive error while building a workbook.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Serialization of export data failed.
    #[error("Export error: {0}")]
    Export(String),

    /// The host environment refused an operation (download, alert, DOM access).
    #[error("Host error: {0}")]
    Host(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        Self::Export(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TableError> for wasm_bindgen::JsValue {
    fn from(e: TableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
