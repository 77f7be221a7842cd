//! In-memory tabular source

use std::collections::HashMap;
use std::sync::RwLock;

use super::{SourceError, SourceResult, TabularSource};

/// Tabular source backed by named in-memory texts
#[derive(Debug, Default)]
pub struct InMemorySource {
    files: RwLock<HashMap<String, String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding a single text under `path`
    pub fn with_file(path: impl Into<String>, text: impl Into<String>) -> Self {
        let source = Self::new();
        source.replace(path, text);
        source
    }

    /// Insert or overwrite the text stored under `path`
    pub fn replace(&self, path: impl Into<String>, text: impl Into<String>) {
        let mut files = match self.files.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        files.insert(path.into(), text.into());
    }
}

impl TabularSource for InMemorySource {
    fn load(&self, path: &str) -> SourceResult<String> {
        let files = self
            .files
            .read()
            .map_err(|_| SourceError::Io("in-memory source lock poisoned".to_string()))?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::FileNotFound(path.to_string()))
    }
}
