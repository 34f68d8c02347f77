//! Learned model-name corrections.
//!
//! When an operator renames a cleaned model, the rename is remembered and
//! replayed on every later document. The store is consulted strictly after
//! the regex cleaning passes, so keys are post-cleaning canonical strings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;

/// Result type for correction-store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage backend for the correction map.
pub trait CorrectionBackend {
    /// Load the full correction map.
    fn load(&self) -> Result<BTreeMap<String, String>>;

    /// Persist the full correction map, replacing previous contents.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()>;
}

/// File-backed storage: a flat JSON object mapping cleaned model names to
/// corrected ones. Every update rewrites the whole file.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorrectionBackend for FileBackend {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            // First run: no file yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        serde_json::from_str(&content).map_err(|e| StoreError::Read(e.to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Write(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::Write(e.to_string()))
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MemoryBackend {
    persisted: std::cell::RefCell<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of what the last persist wrote.
    pub fn persisted(&self) -> BTreeMap<String, String> {
        self.persisted.borrow().clone()
    }
}

impl CorrectionBackend for MemoryBackend {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.persisted.borrow().clone())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        *self.persisted.borrow_mut() = entries.clone();
        Ok(())
    }
}

/// The learned-correction store.
///
/// Backed storage is read once at open time; updates are written through
/// immediately. A persist failure is surfaced to the caller but the
/// in-memory entry is kept, so the session keeps working.
pub struct CorrectionStore {
    backend: Box<dyn CorrectionBackend>,
    entries: BTreeMap<String, String>,
}

impl CorrectionStore {
    /// Open a store over the given backend.
    ///
    /// An unreadable or corrupt backing file degrades to an empty store
    /// with a warning rather than failing the session.
    pub fn open(backend: impl CorrectionBackend + 'static) -> Self {
        let entries = match backend.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not load corrections ({}), starting empty", e);
                BTreeMap::new()
            }
        };

        debug!("Loaded {} learned corrections", entries.len());
        Self {
            backend: Box::new(backend),
            entries,
        }
    }

    /// Open a file-backed store at the given path.
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::open(FileBackend::new(path))
    }

    /// Look up the correction for a cleaned model name. Returns the input
    /// unchanged when no correction is stored.
    pub fn correct<'a>(&'a self, model: &'a str) -> &'a str {
        self.entries.get(model).map(String::as_str).unwrap_or(model)
    }

    /// Remember a correction (last write wins) and persist immediately.
    pub fn remember(
        &mut self,
        original: impl Into<String>,
        corrected: impl Into<String>,
    ) -> Result<()> {
        self.entries.insert(original.into(), corrected.into());
        self.backend.persist(&self.entries)
    }

    /// Forget a correction. Returns whether the entry existed.
    pub fn forget(&mut self, original: &str) -> Result<bool> {
        if self.entries.remove(original).is_none() {
            return Ok(false);
        }
        self.backend.persist(&self.entries)?;
        Ok(true)
    }

    /// Drop all corrections. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.entries.len();
        self.entries.clear();
        self.backend.persist(&self.entries)?;
        Ok(removed)
    }

    /// The stored corrections, ordered by original name.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
