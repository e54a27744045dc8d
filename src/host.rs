//! Host-environment collaborators: saving files and talking to the user.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Triggers a save-as-file in the host environment.
pub trait FileSink {
    fn save(&mut self, content: &[u8], filename: &str, mime_type: &str) -> Result<()>;
}

/// User-facing messages (browser alerts, log lines, ...).
pub trait Notifier {
    fn warn(&self, message: &str);
    fn inform(&self, message: &str);
}

/// A file handed to a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl SavedFile {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Keeps saved files in memory. Clones share the same record, so a test can
/// keep one handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Rc<RefCell<Vec<SavedFile>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<SavedFile> {
        self.files.borrow().clone()
    }

    pub fn last(&self) -> Option<SavedFile> {
        self.files.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl FileSink for MemorySink {
    fn save(&mut self, content: &[u8], filename: &str, mime_type: &str) -> Result<()> {
        self.files.borrow_mut().push(SavedFile {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_vec(),
        });
        Ok(())
    }
}

/// Writes files into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, content: &[u8], filename: &str, mime_type: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        std::fs::write(&path, content)?;
        log::info!("saved {} ({mime_type}, {} bytes)", path.display(), content.len());
        Ok(())
    }
}

/// Routes messages to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn inform(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Kind of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warn,
    Inform,
}

/// Records every message; clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<(NoticeLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NoticeLevel, String)> {
        self.messages.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(level, _)| *level == NoticeLevel::Warn)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((NoticeLevel::Warn, message.to_string()));
    }

    fn inform(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((NoticeLevel::Inform, message.to_string()));
    }
}
