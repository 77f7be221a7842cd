//! File system tabular source
//!
//! Reads delimited text files from below a base directory.
//!
//! ## Security
//!
//! All path operations are validated to prevent path traversal attacks.
//! Paths containing ".." are rejected, and all resolved paths are verified
//! to remain within the base directory.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{SourceError, SourceResult, TabularSource};

/// File system tabular source
pub struct FileSystemSource {
    base_path: PathBuf,
}

impl FileSystemSource {
    /// Create a new file system source
    ///
    /// # Arguments
    ///
    /// * `base_path` - Base directory all loaded paths are resolved against
    ///
    /// # Example
    ///
    /// ```rust
    /// use term_dictionary_sdk::source::FileSystemSource;
    ///
    /// let source = FileSystemSource::new("/data/cohorts");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Resolve a path relative to the base path with security checks.
    ///
    /// - Rejects paths containing ".." components
    /// - Verifies an existing resolved path stays within base_path
    fn resolve_path(&self, path: &str) -> SourceResult<PathBuf> {
        let normalized = path.trim_start_matches('/');

        if normalized.contains("..") {
            return Err(SourceError::PermissionDenied(
                "Path traversal (..) not allowed".to_string(),
            ));
        }

        let full = self.base_path.join(normalized);

        for component in full.components() {
            if matches!(component, Component::ParentDir) {
                return Err(SourceError::PermissionDenied(
                    "Path traversal not allowed".to_string(),
                ));
            }
        }

        if full.exists() {
            let canonical = full
                .canonicalize()
                .map_err(|e| SourceError::Io(format!("Failed to resolve path: {}", e)))?;

            let base_canonical = self
                .base_path
                .canonicalize()
                .unwrap_or_else(|_| self.base_path.clone());

            if !canonical.starts_with(&base_canonical) {
                return Err(SourceError::PermissionDenied(
                    "Path escapes base directory".to_string(),
                ));
            }

            return Ok(canonical);
        }

        Ok(full)
    }
}

impl TabularSource for FileSystemSource {
    fn load(&self, path: &str) -> SourceResult<String> {
        let full_path = self.resolve_path(path)?;
        debug!(path = %full_path.display(), "loading tabular source");

        let bytes = std::fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::FileNotFound(path.to_string())
            } else {
                SourceError::Io(format!("Failed to read file {}: {}", path, e))
            }
        })?;

        String::from_utf8(bytes).map_err(|e| SourceError::Encoding(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_traversal_blocked() {
        let temp = TempDir::new().unwrap();
        let source = FileSystemSource::new(temp.path());

        let result = source.resolve_path("../etc/passwd");
        assert!(matches!(result, Err(SourceError::PermissionDenied(_))));

        let result = source.resolve_path("/foo/../../../etc/passwd");
        assert!(matches!(result, Err(SourceError::PermissionDenied(_))));

        let result = source.resolve_path("valid/path/file.csv");
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_existing_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("cohort.csv"), "sample,sex\n1,M\n").unwrap();

        let source = FileSystemSource::new(temp.path());
        let text = source.load("/cohort.csv").unwrap();
        assert_eq!(text, "sample,sex\n1,M\n");
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let source = FileSystemSource::new(temp.path());

        let result = source.load("missing.csv");
        assert!(matches!(result, Err(SourceError::FileNotFound(p)) if p == "missing.csv"));
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bad.csv"), [0xff, 0xfe, b'\n']).unwrap();

        let source = FileSystemSource::new(temp.path());
        assert!(matches!(
            source.load("bad.csv"),
            Err(SourceError::Encoding(_))
        ));
    }
}
