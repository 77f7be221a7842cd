//! Tabular source abstraction
//!
//! Defines the TabularSource trait and its implementations:
//! - FileSystemSource: delimited files under a base directory
//! - InMemorySource: named texts held in memory (tests, embedders)
//!
//! Sources only hand back raw text. Parsing into rows happens in [`table`].

pub mod filesystem;
pub mod memory;
pub mod table;

pub use filesystem::FileSystemSource;
pub use memory::InMemorySource;
pub use table::{TabularData, parse_table};

/// Error type for source operations
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Source is not valid UTF-8: {0}")]
    Encoding(String),
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Trait for tabular sources
///
/// A source resolves a path to the full raw text of a delimited file. It is
/// called once per façade operation; implementations must not cache across
/// calls unless they can tell when the underlying data changed.
pub trait TabularSource: Send + Sync {
    /// Load the raw text stored at `path`
    fn load(&self, path: &str) -> SourceResult<String>;
}

impl<S: TabularSource + ?Sized> TabularSource for std::sync::Arc<S> {
    fn load(&self, path: &str) -> SourceResult<String> {
        (**self).load(path)
    }
}
