//! Result shapes returned by the query façade

use serde::{Deserialize, Serialize, Serializer};

/// A cell value classified by its term's kind
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedValue {
    /// Categorical value, passed through as text
    Text(String),
    /// Numeric value coerced from the cell
    Number(f64),
    /// Blank cell, or a numeric cell that did not parse
    Undefined,
}

impl Serialize for ClassifiedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClassifiedValue::Text(text) => serializer.serialize_str(text),
            ClassifiedValue::Number(n) => serializer.serialize_f64(*n),
            ClassifiedValue::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

/// Value of one term for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermValue {
    pub key: ClassifiedValue,
}

/// One distinct numeric value and how many entities carry it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericCategory {
    pub value: f64,
    pub count: usize,
}

/// Header of one result column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLabel {
    pub label: String,
}

/// One result cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
}

/// Matching rows projected into a table; the entity-key column comes first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredRows {
    pub columns: Vec<ColumnLabel>,
    pub rows: Vec<Vec<Cell>>,
    /// Entity keys in source order
    pub matched_keys: Vec<String>,
}

/// Outcome of a filtered row query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FilteredRowsResult {
    Matched(FilteredRows),
    /// Nothing matched; a normal outcome, not a failure
    NoMatches,
}

impl FilteredRowsResult {
    pub fn is_no_matches(&self) -> bool {
        matches!(self, FilteredRowsResult::NoMatches)
    }

    pub fn matched(&self) -> Option<&FilteredRows> {
        match self {
            FilteredRowsResult::Matched(rows) => Some(rows),
            FilteredRowsResult::NoMatches => None,
        }
    }
}
