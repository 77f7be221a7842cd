//! Error types for query façade operations

use thiserror::Error;

use crate::dictionary::DictionaryError;
use crate::source::SourceError;

/// Errors surfaced by [`TermDictionary`](super::TermDictionary).
///
/// Only structural problems land here. Dangling term references and bad
/// cells inside a filter degrade to empty matches instead.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The source could not be turned into a dictionary
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// The source could not be loaded or parsed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A term lookup by id failed
    #[error("Term not found: {0}")]
    TermNotFound(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::TermNotFound("age".to_string());
        assert_eq!(err.to_string(), "Term not found: age");

        let err: QueryError = SourceError::FileNotFound("cohort.csv".to_string()).into();
        assert!(err.to_string().contains("cohort.csv"));
    }
}
