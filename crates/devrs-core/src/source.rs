// Devrs Table Source
// Capability trait for acquiring and releasing the raw table resource

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Errors that can occur when acquiring the table resource
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("table resource unavailable: {0}")]
    Unavailable(String),
}

/// A loaded copy of the raw table text.
///
/// This is a scoped acquisition: the handle is obtained from a
/// [`TableSource`] at the start of a reload and must be handed back via
/// [`TableSource::release`] once the scan completes, on every exit path.
#[derive(Debug)]
pub struct TableText {
    text: String,
}

impl TableText {
    /// Wrap raw text in a handle. Adapters call this from `load`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw table text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Trait for table resource providers
///
/// Implementations adapt whatever owns the raw table text (a file, an
/// asset system, a test fixture) to the lookup core. `release` exists so
/// hosts that pin resources in memory can free them after parsing.
pub trait TableSource {
    /// Acquire the raw table text.
    fn load(&mut self) -> Result<TableText, SourceError>;

    /// Hand a previously loaded handle back to the source.
    fn release(&mut self, text: TableText);
}

/// Filesystem-backed table source.
///
/// Reads the file fresh on every load, so edits to the table are picked
/// up by the next reload.
#[derive(Debug, Clone)]
pub struct FsTableSource {
    path: PathBuf,
}

impl FsTableSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for FsTableSource {
    fn load(&mut self) -> Result<TableText, SourceError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        Ok(TableText::new(text))
    }

    fn release(&mut self, text: TableText) {
        // Nothing pins the text; dropping it frees the memory.
        drop(text);
    }
}

#[derive(Debug, Default)]
struct StaticInner {
    text: String,
    available: bool,
    loads: usize,
    releases: usize,
}

/// In-memory table source with load/release bookkeeping.
///
/// Clones share the same underlying text, so a test (or a simulator
/// harness) can swap the table or make it unavailable between reloads
/// while a lookup holds the other handle.
#[derive(Debug, Clone, Default)]
pub struct StaticTableSource {
    inner: Rc<RefCell<StaticInner>>,
}

impl StaticTableSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StaticInner {
                text: text.into(),
                available: true,
                loads: 0,
                releases: 0,
            })),
        }
    }

    /// Replace the table text served by subsequent loads.
    pub fn set_text(&self, text: impl Into<String>) {
        self.inner.borrow_mut().text = text.into();
    }

    /// Make subsequent loads fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.inner.borrow_mut().available = available;
    }

    /// Number of successful loads so far.
    pub fn loads(&self) -> usize {
        self.inner.borrow().loads
    }

    /// Number of releases so far.
    pub fn releases(&self) -> usize {
        self.inner.borrow().releases
    }

    /// Handles loaded but not yet released.
    pub fn outstanding(&self) -> usize {
        let inner = self.inner.borrow();
        inner.loads - inner.releases
    }
}

impl TableSource for StaticTableSource {
    fn load(&mut self) -> Result<TableText, SourceError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.available {
            return Err(SourceError::Unavailable("static source disabled".to_string()));
        }
        inner.loads += 1;
        Ok(TableText::new(inner.text.clone()))
    }

    fn release(&mut self, text: TableText) {
        self.inner.borrow_mut().releases += 1;
        drop(text);
    }
}
