//! Output formatting for CLI

use clap::ValueEnum;
use serde::Serialize;

use super::error::CliError;
use crate::dictionary::Term;
use crate::query::{FilteredRowsResult, NumericCategory};

/// Rendering of command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    Json,
    Yaml,
}

/// Serialize `value` as pretty JSON or YAML
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| CliError::OutputError(e.to_string()))
        }
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_string_pretty(value).map_err(|e| CliError::OutputError(e.to_string()))
        }
    }
}

/// Format terms in compact mode
pub fn format_terms(terms: &[Term]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} term(s):\n", terms.len()));

    for term in terms {
        output.push_str(&format!("\n  {} ({})\n", term.id, term.kind));
        if term.name != term.id {
            output.push_str(&format!("    Name: {}\n", term.name));
        }
        if let Some(values) = &term.value_enumeration {
            let keys: Vec<&str> = values.keys().map(String::as_str).collect();
            output.push_str(&format!("    Values: {}\n", keys.join(", ")));
        }
        if let Some(bins) = &term.default_bins {
            output.push_str(&format!(
                "    Bins: size {} from {}\n",
                bins.bin_size, bins.first_bin.stop
            ));
        }
    }

    output
}

/// Format a numeric summary as `value: count` lines
pub fn format_summary(summary: &[NumericCategory]) -> String {
    if summary.is_empty() {
        return "No numeric values\n".to_string();
    }
    summary
        .iter()
        .map(|c| format!("{}: {}\n", c.value, c.count))
        .collect()
}

/// Format filtered rows as a delimited table
pub fn format_filtered_rows(result: &FilteredRowsResult) -> String {
    let Some(rows) = result.matched() else {
        return "No matching entities\n".to_string();
    };

    let mut output = String::new();
    let header: Vec<&str> = rows.columns.iter().map(|c| c.label.as_str()).collect();
    output.push_str(&header.join("\t"));
    output.push('\n');
    for row in &rows.rows {
        let cells: Vec<&str> = row.iter().map(|c| c.value.as_str()).collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }
    output.push_str(&format!("\n{} matching entit(ies)\n", rows.matched_keys.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryBuilder;
    use crate::query::{Cell, ColumnLabel, FilteredRows};

    #[test]
    fn test_format_terms() {
        let index = DictionaryBuilder::new()
            .build_from_text("sample,sex,age_at_dx\ns1,M,10\ns2,F,20\n")
            .unwrap();
        let text = format_terms(index.terms());
        assert!(text.starts_with("3 term(s):"));
        assert!(text.contains("sex (categorical)"));
        assert!(text.contains("Values: F, M"));
        assert!(text.contains("Name: age at dx"));
    }

    #[test]
    fn test_format_filtered_rows() {
        assert_eq!(
            format_filtered_rows(&FilteredRowsResult::NoMatches),
            "No matching entities\n"
        );

        let result = FilteredRowsResult::Matched(FilteredRows {
            columns: vec![
                ColumnLabel {
                    label: "id".to_string(),
                },
                ColumnLabel {
                    label: "sex".to_string(),
                },
            ],
            rows: vec![vec![
                Cell {
                    value: "2".to_string(),
                },
                Cell {
                    value: "F".to_string(),
                },
            ]],
            matched_keys: vec!["2".to_string()],
        });
        let text = format_filtered_rows(&result);
        assert!(text.starts_with("id\tsex\n2\tF\n"));
    }

    #[test]
    fn test_render_yaml() {
        let summary = vec![NumericCategory {
            value: 1.0,
            count: 2,
        }];
        let yaml = render(&summary, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("count: 2"));
    }
}
