//! Browser implementations of the host collaborators.

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::error::{Result, TableError};
use crate::host::{FileSink, Notifier};

fn host_err(context: &str, err: &wasm_bindgen::JsValue) -> TableError {
    TableError::Host(format!("{context}: {err:?}"))
}

/// Saves files through a temporary object URL and a synthetic anchor click.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadSink;

impl FileSink for DownloadSink {
    fn save(&mut self, content: &[u8], filename: &str, mime_type: &str) -> Result<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| TableError::Host("no document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| TableError::Host("document has no body".to_string()))?;

        let parts = Array::new();
        parts.push(&Uint8Array::from(content));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| host_err("blob", &e))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| host_err("object url", &e))?;

        let link = document
            .create_element("a")
            .map_err(|e| host_err("anchor", &e))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| TableError::Host("anchor cast".to_string()))?;
        link.set_href(&url);
        link.set_download(filename);
        body.append_child(&link).map_err(|e| host_err("append", &e))?;
        link.click();
        let _ = body.remove_child(&link);
        let _ = Url::revoke_object_url(&url);
        Ok(())
    }
}

/// Shows messages with `window.alert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl AlertNotifier {
    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

impl Notifier for AlertNotifier {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
        Self::alert(message);
    }

    fn inform(&self, message: &str) {
        log::info!("{message}");
        Self::alert(message);
    }
}
