//! JSON document storage
//!
//! Settings and registry files are handled as untyped, order-preserving JSON
//! objects so fields this crate does not know about survive a load/save cycle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PluginsError, Result};

/// A top-level JSON object
pub type Document = Map<String, Value>;

/// Load/save access to JSON documents by path
pub trait DocumentStore {
    /// Load a document. A missing file is `Ok(None)`; unreadable or malformed
    /// content is an error.
    fn load(&self, path: &Path) -> Result<Option<Document>>;

    /// Write a document, creating parent directories as needed
    fn save(&self, path: &Path, document: &Document) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// Parse document text, requiring a top-level object
pub fn parse_document(path: &Path, content: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(content).map_err(|e| PluginsError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(PluginsError::InvalidDocument {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Render a document as 2-space indented JSON with non-ASCII kept literally
pub fn render_document(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Filesystem-backed store
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl DocumentStore for FsStore {
    fn load(&self, path: &Path) -> Result<Option<Document>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let document = parse_document(path, &content)?;
        debug!(path = %path.display(), keys = document.len(), "loaded document");
        Ok(Some(document))
    }

    fn save(&self, path: &Path, document: &Document) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = render_document(document)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "saved document");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory store holding raw document text, keyed by path
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with raw text (may be malformed on purpose)
    pub fn insert_raw(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), content.into());
    }

    /// Seed a file with a JSON value
    pub fn insert_json(&self, path: impl Into<PathBuf>, value: &Value) {
        self.insert_raw(path, value.to_string());
    }

    /// Raw text of a stored file
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Parsed JSON of a stored file
    pub fn json(&self, path: &Path) -> Option<Value> {
        self.raw(path)
            .and_then(|content| serde_json::from_str(&content).ok())
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Option<Document>> {
        match self.files.borrow().get(path) {
            Some(content) => parse_document(path, content).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, path: &Path, document: &Document) -> Result<()> {
        let content = render_document(document)?;
        self.files.borrow_mut().insert(path.to_path_buf(), content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }
}
