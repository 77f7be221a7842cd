//! Error types for dictionary building

use thiserror::Error;

use crate::source::SourceError;

/// Errors that can occur while building a term dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Header row is missing or has an unusable column name
    #[error("Malformed schema at column {column}: {reason}")]
    MalformedSchema { column: usize, reason: String },

    /// Loading or parsing the source failed
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl DictionaryError {
    pub(crate) fn malformed(column: usize, reason: impl Into<String>) -> Self {
        DictionaryError::MalformedSchema {
            column,
            reason: reason.into(),
        }
    }
}

/// Result type for dictionary operations
pub type DictionaryResult<T> = Result<T, DictionaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DictionaryError::malformed(2, "blank column name");
        assert_eq!(
            err.to_string(),
            "Malformed schema at column 2: blank column name"
        );

        let err: DictionaryError = SourceError::FileNotFound("a.csv".to_string()).into();
        assert!(err.to_string().contains("a.csv"));
    }
}
