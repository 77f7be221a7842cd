//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::query::QueryError;

/// Errors reported by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid filter: {0}")]
    FilterParseError(String),

    #[error("Failed to format output: {0}")]
    OutputError(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}
