//! CLI command implementations

pub mod filter;
pub mod terms;

use std::path::{Path, PathBuf};

use super::error::CliError;
use crate::dictionary::DictionaryConfig;
use crate::query::TermDictionary;
use crate::source::FileSystemSource;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct CommonArgs {
    /// Delimited file to serve
    pub file: PathBuf,
    /// TOML configuration file
    pub config: Option<PathBuf>,
    /// Overrides the configured entity key column
    pub key_column: Option<String>,
}

/// Resolve the dictionary configuration from file and flags
pub fn load_config(args: &CommonArgs) -> Result<DictionaryConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => DictionaryConfig::from_toml_file(path)
            .map_err(|e| CliError::ConfigError(format!("{:#}", e)))?,
        None => DictionaryConfig::default(),
    };
    if let Some(column) = &args.key_column {
        config.entity_key_column = column.clone();
    }
    Ok(config)
}

/// Open a dictionary over `args.file`, rooted at the file's directory
pub fn open_dictionary(args: &CommonArgs) -> Result<TermDictionary<FileSystemSource>, CliError> {
    let config = load_config(args)?;

    let canonical = args
        .file
        .canonicalize()
        .map_err(|e| CliError::FileReadError(args.file.clone(), e.to_string()))?;
    let name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            CliError::InvalidArgument(format!("Not a file: {}", args.file.display()))
        })?
        .to_string();
    let base = canonical.parent().unwrap_or_else(|| Path::new("/"));

    Ok(TermDictionary::with_config(
        FileSystemSource::new(base),
        name,
        config,
    ))
}
