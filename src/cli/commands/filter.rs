//! CLI command for filtering entities

use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;

use super::{CommonArgs, open_dictionary};
use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_filtered_rows, render};

/// Load the filter expression: inline JSON, `@path` for a file, or `-` for stdin
fn load_filter(filter: Option<&str>) -> Result<Value, CliError> {
    let text = match filter {
        None => return Ok(Value::Null),
        Some("-") => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
            content
        }
        Some(arg) => match arg.strip_prefix('@') {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path)
                    .map_err(|e| CliError::FileReadError(path, e.to_string()))?
            }
            None => arg.to_string(),
        },
    };

    serde_json::from_str(&text).map_err(|e| CliError::FilterParseError(e.to_string()))
}

/// Handle the `filter` command
pub fn handle_filter(
    args: &CommonArgs,
    filter: Option<&str>,
    format: OutputFormat,
) -> Result<String, CliError> {
    let raw = load_filter(filter)?;
    let dict = open_dictionary(args)?;
    let result = dict.get_filtered_rows(&raw)?;

    match format {
        OutputFormat::Text => Ok(format_filtered_rows(&result)),
        _ => render(&result, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cohort(dir: &TempDir) -> CommonArgs {
        let file = dir.path().join("cohort.csv");
        fs::write(&file, "sex,id,age\nM,1,10\nF,2,20\nF,3,30\n").unwrap();
        CommonArgs {
            file,
            config: None,
            key_column: Some("id".to_string()),
        }
    }

    #[test]
    fn test_inline_filter_moves_key_first() {
        let dir = TempDir::new().unwrap();
        let filter = r#"{"type":"leaf","termId":"sex","values":["F"]}"#;
        let out = handle_filter(&cohort(&dir), Some(filter), OutputFormat::Text).unwrap();
        assert!(out.starts_with("id\tsex\tage\n2\tF\t20\n3\tF\t30\n"));
    }

    #[test]
    fn test_filter_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filter.json");
        fs::write(
            &path,
            r#"{"type":"leaf","termId":"age","kind":"numeric","ranges":[{"min":25}]}"#,
        )
        .unwrap();
        let arg = format!("@{}", path.display());

        let out = handle_filter(&cohort(&dir), Some(&arg), OutputFormat::Json).unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["status"], "matched");
        assert_eq!(json["matchedKeys"], serde_json::json!(["3"]));
    }

    #[test]
    fn test_no_filter_and_no_matches() {
        let dir = TempDir::new().unwrap();
        let all = handle_filter(&cohort(&dir), None, OutputFormat::Text).unwrap();
        assert!(all.contains("3 matching entit(ies)"));

        let filter = r#"{"type":"leaf","termId":"sex","values":["X"]}"#;
        let none = handle_filter(&cohort(&dir), Some(filter), OutputFormat::Text).unwrap();
        assert_eq!(none, "No matching entities\n");
    }

    #[test]
    fn test_invalid_filter_json() {
        assert!(matches!(
            load_filter(Some("{oops")),
            Err(CliError::FilterParseError(_))
        ));
    }
}
