//! Dictionary builder: infers term definitions from a tabular snapshot

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{info, warn};

use super::config::DictionaryConfig;
use super::error::{DictionaryError, DictionaryResult};
use super::numeric::{self, NumericStats, decimal_depth, parse_number};
use super::types::{DictionaryStats, Term, TermIndex, TermKind, ValueLabel};
use crate::source::{TabularData, parse_table};

/// Per-column observations gathered in the single scan over data rows
#[derive(Debug, Default)]
struct ColumnAccumulator {
    distinct: BTreeSet<String>,
    all_numeric: bool,
    max_decimals: usize,
    stats: NumericStats,
    truncated: bool,
}

impl ColumnAccumulator {
    fn new() -> Self {
        Self {
            all_numeric: true,
            ..Default::default()
        }
    }

    fn observe(&mut self, value: &str, max_distinct: usize) {
        match decimal_depth(value) {
            Some(depth) => match parse_number(value) {
                Some(n) => {
                    self.max_decimals = self.max_decimals.max(depth);
                    self.stats.add(n);
                }
                // too large for a finite f64
                None => self.all_numeric = false,
            },
            None => self.all_numeric = false,
        }

        // Classification relies on the flags above, so a capped set only
        // shortens the categorical enumeration.
        if max_distinct == 0 || self.distinct.len() < max_distinct {
            self.distinct.insert(value.to_string());
        } else if !self.distinct.contains(value) {
            self.truncated = true;
        }
    }
}

/// Builds a [`TermIndex`] from delimited tabular data.
///
/// Every column becomes one root term. Columns whose observed values are all
/// decimal literals become `integer` or `float` terms with default bins; all
/// others (and the entity key column) become `categorical`.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    config: DictionaryConfig,
}

impl DictionaryBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self::with_config(DictionaryConfig::default())
    }

    /// Create a builder with custom configuration
    pub fn with_config(config: DictionaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Parse raw delimited text and build its dictionary
    pub fn build_from_text(&self, raw: &str) -> DictionaryResult<TermIndex> {
        let data = parse_table(raw, self.config.delimiter)?;
        self.build(&data)
    }

    /// Build from a header line and its data lines
    pub fn build_from_lines(
        &self,
        header_line: &str,
        data_lines: &[&str],
    ) -> DictionaryResult<TermIndex> {
        let mut raw = String::from(header_line);
        for line in data_lines {
            raw.push('\n');
            raw.push_str(line);
        }
        self.build_from_text(&raw)
    }

    /// Build the dictionary of a parsed snapshot
    pub fn build(&self, data: &TabularData) -> DictionaryResult<TermIndex> {
        let ids = self.column_ids(&data.header)?;
        let key_column = self.resolve_entity_key(&ids);

        let mut columns: Vec<ColumnAccumulator> =
            ids.iter().map(|_| ColumnAccumulator::new()).collect();
        let mut stats = DictionaryStats::default();
        let mut seen_keys: HashSet<&str> = HashSet::new();

        for row in 0..data.len() {
            let key = data.cell(row, key_column);
            if key.is_empty() {
                stats.rows_skipped += 1;
                continue;
            }
            // same first-row-wins rule as the evaluator's entity view
            if !seen_keys.insert(key) {
                stats.duplicate_keys += 1;
                continue;
            }
            stats.rows_processed += 1;

            for (column, acc) in columns.iter_mut().enumerate() {
                let cell = data.cell(row, column);
                let value = if cell.is_empty() {
                    self.config.undefined_label.as_str()
                } else {
                    cell
                };
                acc.observe(value, self.config.max_distinct_values);
            }
        }

        if stats.rows_skipped > 0 {
            warn!(
                skipped = stats.rows_skipped,
                "rows without an entity key were ignored"
            );
        }
        if stats.duplicate_keys > 0 {
            warn!(
                duplicates = stats.duplicate_keys,
                "repeated entity keys, keeping the first row of each"
            );
        }

        let terms: Vec<Term> = ids
            .into_iter()
            .zip(columns)
            .enumerate()
            .map(|(column, (id, acc))| {
                if acc.truncated {
                    warn!(
                        term = %id,
                        cap = self.config.max_distinct_values,
                        "distinct value cap reached"
                    );
                    stats.truncated_columns.push(id.clone());
                }
                self.make_term(id, column, column == key_column, acc)
            })
            .collect();

        stats.terms = terms.len();
        info!(
            terms = stats.terms,
            rows = stats.rows_processed,
            skipped = stats.rows_skipped,
            "built term dictionary"
        );

        Ok(TermIndex::new(
            terms,
            key_column,
            self.config.undefined_label.clone(),
            stats,
        ))
    }

    /// Trimmed, non-blank, unique column ids
    fn column_ids(&self, header: &[String]) -> DictionaryResult<Vec<String>> {
        if header.is_empty() {
            return Err(DictionaryError::malformed(0, "source has no header row"));
        }

        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(header.len());
        for (column, raw) in header.iter().enumerate() {
            let id = raw.trim();
            if id.is_empty() {
                return Err(DictionaryError::malformed(column, "blank column name"));
            }
            if !seen.insert(id) {
                return Err(DictionaryError::malformed(
                    column,
                    format!("duplicate column name '{}'", id),
                ));
            }
            ids.push(id.to_string());
        }
        Ok(ids)
    }

    fn resolve_entity_key(&self, ids: &[String]) -> usize {
        let wanted = self.config.entity_key_column.trim();
        match ids.iter().position(|id| id.eq_ignore_ascii_case(wanted)) {
            Some(column) => column,
            None => {
                warn!(
                    label = %wanted,
                    fallback = %ids[0],
                    "entity key column not found, using the first column"
                );
                0
            }
        }
    }

    fn make_term(&self, id: String, column: usize, is_key: bool, acc: ColumnAccumulator) -> Term {
        let name = id.replace(self.config.name_separator, " ");

        let mut term = Term {
            id,
            name,
            column_index: column,
            kind: TermKind::Categorical,
            value_enumeration: None,
            default_bins: None,
            is_root: true,
            parent_id: None,
        };

        if is_key || !acc.all_numeric {
            let values: BTreeMap<String, ValueLabel> = acc
                .distinct
                .into_iter()
                .map(|v| {
                    let label = ValueLabel { label: v.clone() };
                    (v, label)
                })
                .collect();
            term.value_enumeration = Some(values);
            return term;
        }

        term.kind = if acc.max_decimals > 0 {
            TermKind::Float
        } else {
            TermKind::Integer
        };
        term.default_bins = numeric::default_bins(
            term.kind,
            &acc.stats,
            self.config.bin_count,
        );
        term
    }
}
