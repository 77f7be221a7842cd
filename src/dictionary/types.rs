//! Term dictionary types

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Id of the synthetic root every inferred term hangs under
pub const ROOT_TERM_ID: &str = "__root";

/// Value kind of an inferred term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Categorical,
    Integer,
    Float,
}

impl TermKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, TermKind::Integer | TermKind::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Categorical => "categorical",
            TermKind::Integer => "integer",
            TermKind::Float => "float",
        }
    }
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binning scheme family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinMode {
    RegularBin,
}

/// The first bin of a regular scheme; always unbounded below
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstBin {
    pub start_unbounded: bool,
    pub stop: f64,
}

/// The last bin of a regular scheme, only set for the two-bin fallback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastBin {
    pub start: f64,
    pub stop_unbounded: bool,
}

/// Default discretization for a numeric term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultBins {
    #[serde(rename = "type")]
    pub mode: BinMode,
    pub bin_size: f64,
    pub start_inclusive: bool,
    pub stop_inclusive: bool,
    pub first_bin: FirstBin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bin: Option<LastBin>,
}

/// Display label of one categorical value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueLabel {
    pub label: String,
}

/// One inferred column descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: String,
    pub name: String,
    pub column_index: usize,
    pub kind: TermKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_enumeration: Option<BTreeMap<String, ValueLabel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_bins: Option<DefaultBins>,
    pub is_root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Term {
    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    /// Whether `value` is one of this term's enumerated categories
    pub fn has_category(&self, value: &str) -> bool {
        self.value_enumeration
            .as_ref()
            .is_some_and(|values| values.contains_key(value))
    }
}

/// The synthetic root marker offered to tree-shaped consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMarker {
    pub id: String,
    pub name: String,
    pub child_ids: Vec<String>,
}

/// Statistics from one dictionary build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryStats {
    /// Data rows that contributed to inference
    pub rows_processed: usize,
    /// Data rows dropped for lacking an entity key
    pub rows_skipped: usize,
    /// Data rows dropped because their entity key already appeared
    #[serde(default)]
    pub duplicate_keys: usize,
    /// Number of inferred terms
    pub terms: usize,
    /// Columns whose distinct-value tracking hit the configured cap
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub truncated_columns: Vec<String>,
}

/// The inferred schema of one tabular source.
///
/// Built wholesale by the dictionary builder and never patched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TermIndex {
    terms: Vec<Term>,
    by_id: HashMap<String, usize>,
    entity_key_column: usize,
    undefined_label: String,
    root: RootMarker,
    stats: DictionaryStats,
}

impl TermIndex {
    pub(crate) fn new(
        terms: Vec<Term>,
        entity_key_column: usize,
        undefined_label: impl Into<String>,
        stats: DictionaryStats,
    ) -> Self {
        let by_id = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.id.clone(), i))
            .collect();
        let root = RootMarker {
            id: ROOT_TERM_ID.to_string(),
            name: "root".to_string(),
            child_ids: terms.iter().map(|t| t.id.clone()).collect(),
        };
        Self {
            terms,
            by_id,
            entity_key_column,
            undefined_label: undefined_label.into(),
            root,
            stats,
        }
    }

    /// All terms in column order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn get(&self, id: &str) -> Option<&Term> {
        self.by_id.get(id).map(|&i| &self.terms[i])
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column index of the entity key
    pub fn entity_key_column(&self) -> usize {
        self.entity_key_column
    }

    pub fn entity_key_term(&self) -> Option<&Term> {
        self.terms.get(self.entity_key_column)
    }

    /// Category blank cells are reported and matched as
    pub fn undefined_label(&self) -> &str {
        &self.undefined_label
    }

    pub fn root(&self) -> &RootMarker {
        &self.root
    }

    pub fn is_root_marker(&self, id: &str) -> bool {
        id == self.root.id
    }

    pub fn stats(&self) -> &DictionaryStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str, column_index: usize, kind: TermKind) -> Term {
        Term {
            id: id.to_string(),
            name: id.to_string(),
            column_index,
            kind,
            value_enumeration: None,
            default_bins: None,
            is_root: true,
            parent_id: None,
        }
    }

    #[test]
    fn test_term_serialization_shape() {
        let mut t = term("age", 2, TermKind::Integer);
        t.default_bins = Some(DefaultBins {
            mode: BinMode::RegularBin,
            bin_size: 4.0,
            start_inclusive: true,
            stop_inclusive: false,
            first_bin: FirstBin {
                start_unbounded: true,
                stop: 14.0,
            },
            last_bin: None,
        });

        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["columnIndex"], 2);
        assert_eq!(json["kind"], "integer");
        assert_eq!(json["defaultBins"]["type"], "regular-bin");
        assert_eq!(json["defaultBins"]["bin_size"], 4.0);
        assert!(json.get("valueEnumeration").is_none());
        assert!(json["defaultBins"].get("last_bin").is_none());
    }

    #[test]
    fn test_index_lookup_and_root() {
        let index = TermIndex::new(
            vec![
                term("id", 0, TermKind::Categorical),
                term("age", 1, TermKind::Integer),
            ],
            0,
            "undefined",
            DictionaryStats::default(),
        );

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("age").unwrap().column_index, 1);
        assert!(index.get("missing").is_none());
        assert_eq!(index.entity_key_term().unwrap().id, "id");
        assert!(index.is_root_marker(ROOT_TERM_ID));
        assert_eq!(index.root().child_ids, vec!["id", "age"]);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TermKind::Float.to_string(), "float");
        assert!(TermKind::Integer.is_numeric());
        assert!(!TermKind::Categorical.is_numeric());
    }
}
