//! CLI commands for browsing the term dictionary

use super::{CommonArgs, open_dictionary};
use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_summary, format_terms, render};
use crate::dictionary::Term;

/// Handle the `terms` command
pub fn handle_terms(args: &CommonArgs, format: OutputFormat) -> Result<String, CliError> {
    let dict = open_dictionary(args)?;
    let terms = dict.list_root_terms()?;

    match format {
        OutputFormat::Text => {
            let stats = dict.dictionary()?.stats().clone();
            let mut output = format_terms(&terms);
            output.push_str(&format!(
                "\nRows processed: {}, skipped: {}, duplicate keys: {}\n",
                stats.rows_processed, stats.rows_skipped, stats.duplicate_keys
            ));
            if !stats.truncated_columns.is_empty() {
                output.push_str(&format!(
                    "Truncated columns: {}\n",
                    stats.truncated_columns.join(", ")
                ));
            }
            Ok(output)
        }
        _ => render(&terms, format),
    }
}

/// Handle the `search` command
pub fn handle_search(
    args: &CommonArgs,
    substring: &str,
    numeric_only: bool,
    format: OutputFormat,
) -> Result<String, CliError> {
    let dict = open_dictionary(args)?;
    let numeric = |term: &Term| term.is_numeric();
    let usecase: Option<&dyn Fn(&Term) -> bool> =
        if numeric_only { Some(&numeric) } else { None };

    let terms = dict.search_terms_by_name(substring, usecase)?;
    match format {
        OutputFormat::Text => Ok(format_terms(&terms)),
        _ => render(&terms, format),
    }
}

/// Handle the `values` command
pub fn handle_values(
    args: &CommonArgs,
    term_ids: &[String],
    format: OutputFormat,
) -> Result<String, CliError> {
    if term_ids.is_empty() {
        return Err(CliError::InvalidArgument(
            "At least one term id is required".to_string(),
        ));
    }
    let dict = open_dictionary(args)?;
    let ids: Vec<&str> = term_ids.iter().map(String::as_str).collect();
    let values = dict.get_entity_values(&ids)?;

    // text mode has no table shape for nested records
    let format = match format {
        OutputFormat::Text => OutputFormat::Json,
        other => other,
    };
    render(&values, format)
}

/// Handle the `summary` command
pub fn handle_summary(
    args: &CommonArgs,
    term_id: &str,
    format: OutputFormat,
) -> Result<String, CliError> {
    let dict = open_dictionary(args)?;
    // surface unknown ids instead of printing an empty summary
    dict.get_term(term_id)?;
    let summary = dict.get_numeric_category_summary(term_id)?;

    match format {
        OutputFormat::Text => Ok(format_summary(&summary)),
        _ => render(&summary, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cohort(dir: &TempDir) -> CommonArgs {
        let file = dir.path().join("cohort.csv");
        fs::write(&file, "id,sex,age\n1,M,10\n2,F,20\n3,F,30\n").unwrap();
        CommonArgs {
            file,
            config: None,
            key_column: Some("id".to_string()),
        }
    }

    #[test]
    fn test_terms_json() {
        let dir = TempDir::new().unwrap();
        let out = handle_terms(&cohort(&dir), OutputFormat::Json).unwrap();
        let terms: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(terms.as_array().unwrap().len(), 3);
        assert_eq!(terms[2]["kind"], "integer");
    }

    #[test]
    fn test_search_numeric_only() {
        let dir = TempDir::new().unwrap();
        let out = handle_search(&cohort(&dir), "", true, OutputFormat::Text).unwrap();
        assert!(out.starts_with("1 term(s):"));
        assert!(out.contains("age (integer)"));
    }

    #[test]
    fn test_values_requires_terms() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            handle_values(&cohort(&dir), &[], OutputFormat::Json),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_summary_unknown_term() {
        let dir = TempDir::new().unwrap();
        assert!(handle_summary(&cohort(&dir), "nope", OutputFormat::Text).is_err());
        let out = handle_summary(&cohort(&dir), "age", OutputFormat::Text).unwrap();
        assert_eq!(out, "10: 1\n20: 1\n30: 1\n");
    }
}
