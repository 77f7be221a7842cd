//! Query façade over one tabular source
//!
//! [`TermDictionary`] is what callers talk to. Every operation loads the
//! source text once, parses it into a snapshot, and reuses the cached
//! [`TermIndex`] when the text has not changed since the last build.

mod error;
mod types;

pub use error::{QueryError, QueryResult};
pub use types::{
    Cell, ClassifiedValue, ColumnLabel, FilteredRows, FilteredRowsResult, NumericCategory,
    TermValue,
};

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::dictionary::numeric::parse_number;
use crate::dictionary::{DictionaryBuilder, DictionaryConfig, Term, TermIndex};
use crate::filter::{EntityRows, FilterEvaluator, normalize};
use crate::source::{TabularData, TabularSource, parse_table};

/// Per-entity values of the requested terms, keyed by entity then term id
pub type EntityValues = BTreeMap<String, BTreeMap<String, TermValue>>;

struct CachedIndex {
    fingerprint: [u8; 32],
    index: Arc<TermIndex>,
}

/// One loaded snapshot and the dictionary that describes it
struct Snapshot {
    data: TabularData,
    index: Arc<TermIndex>,
}

/// Term dictionary and filtering over a single delimited file.
///
/// The inferred index is cached behind a SHA-256 fingerprint of the source
/// text, so edits to the file are picked up on the next call.
pub struct TermDictionary<S: TabularSource> {
    source: S,
    path: String,
    config: DictionaryConfig,
    cache: RwLock<Option<CachedIndex>>,
}

impl<S: TabularSource> TermDictionary<S> {
    /// Serve the file at `path` of `source` with default configuration
    pub fn new(source: S, path: impl Into<String>) -> Self {
        Self::with_config(source, path, DictionaryConfig::default())
    }

    pub fn with_config(source: S, path: impl Into<String>, config: DictionaryConfig) -> Self {
        Self {
            source,
            path: path.into(),
            config,
            cache: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Drop the cached index; the next call rebuilds it
    pub fn invalidate(&self) {
        let mut cache = match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cache = None;
    }

    /// The current term index
    pub fn dictionary(&self) -> QueryResult<Arc<TermIndex>> {
        Ok(self.snapshot()?.index)
    }

    /// All terms except the synthetic root marker
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn list_root_terms(&self) -> QueryResult<Vec<Term>> {
        let index = self.snapshot()?.index;
        Ok(index
            .terms()
            .iter()
            .filter(|term| !index.is_root_marker(&term.id))
            .cloned()
            .collect())
    }

    /// Children of `parent_id`; always empty since inferred schemas are flat
    pub fn list_child_terms(&self, parent_id: &str) -> Vec<Term> {
        debug!(parent = parent_id, "inferred dictionaries have no child terms");
        Vec::new()
    }

    /// Terms whose display name contains `substring`, ignoring case.
    ///
    /// `usecase` narrows the result to terms the caller can use in its
    /// current context.
    #[instrument(skip(self, usecase), fields(path = %self.path))]
    pub fn search_terms_by_name(
        &self,
        substring: &str,
        usecase: Option<&dyn Fn(&Term) -> bool>,
    ) -> QueryResult<Vec<Term>> {
        let needle = substring.to_lowercase();
        let index = self.snapshot()?.index;
        Ok(index
            .terms()
            .iter()
            .filter(|term| term.name.to_lowercase().contains(&needle))
            .filter(|term| usecase.is_none_or(|allowed| allowed(*term)))
            .cloned()
            .collect())
    }

    pub fn get_term(&self, id: &str) -> QueryResult<Term> {
        let index = self.snapshot()?.index;
        index
            .get(id)
            .cloned()
            .ok_or_else(|| QueryError::TermNotFound(id.to_string()))
    }

    /// Number of distinct entities in the source
    pub fn sample_count(&self) -> QueryResult<usize> {
        let snapshot = self.snapshot()?;
        let rows = EntityRows::new(&snapshot.data, snapshot.index.entity_key_column());
        Ok(rows.len())
    }

    /// Values of `term_ids` for every entity, in one pass over the rows.
    ///
    /// Numeric terms yield numbers, categorical terms yield text, and blank
    /// cells yield [`ClassifiedValue::Undefined`]. Unknown ids are skipped.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn get_entity_values(&self, term_ids: &[&str]) -> QueryResult<EntityValues> {
        let snapshot = self.snapshot()?;
        let index = &snapshot.index;
        let terms: Vec<&Term> = term_ids.iter().filter_map(|id| index.get(id)).collect();
        if terms.len() < term_ids.len() {
            debug!(
                requested = term_ids.len(),
                known = terms.len(),
                "ignoring unknown term ids"
            );
        }

        let rows = EntityRows::new(&snapshot.data, index.entity_key_column());
        let mut values = EntityValues::new();
        for (key, row) in rows.iter() {
            let record = terms
                .iter()
                .map(|term| {
                    let cell = rows.cell(row, term.column_index);
                    (term.id.clone(), TermValue {
                        key: classify(term, cell),
                    })
                })
                .collect();
            values.insert(key.to_string(), record);
        }
        Ok(values)
    }

    /// Distinct values of a numeric term with their counts, ascending by
    /// value. Non-numeric and unknown terms give an empty list.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn get_numeric_category_summary(
        &self,
        term_id: &str,
    ) -> QueryResult<Vec<NumericCategory>> {
        let snapshot = self.snapshot()?;
        let Some(term) = snapshot.index.get(term_id).filter(|t| t.is_numeric()) else {
            return Ok(Vec::new());
        };

        let rows = EntityRows::new(&snapshot.data, snapshot.index.entity_key_column());
        let mut counts: HashMap<u64, NumericCategory> = HashMap::new();
        for (_, row) in rows.iter() {
            let Some(value) = parse_number(rows.cell(row, term.column_index)) else {
                continue;
            };
            // fold -0.0 into 0.0
            let value = if value == 0.0 { 0.0 } else { value };
            counts
                .entry(value.to_bits())
                .or_insert(NumericCategory { value, count: 0 })
                .count += 1;
        }

        let mut summary: Vec<NumericCategory> = counts.into_values().collect();
        summary.sort_by(|a, b| a.value.total_cmp(&b.value));
        Ok(summary)
    }

    /// Normalize `raw_filter`, evaluate it, and project the matching rows.
    ///
    /// The entity-key column is moved to the front; rows keep source order.
    #[instrument(skip(self, raw_filter), fields(path = %self.path))]
    pub fn get_filtered_rows(&self, raw_filter: &Value) -> QueryResult<FilteredRowsResult> {
        let snapshot = self.snapshot()?;
        let index = &snapshot.index;
        let rows = EntityRows::new(&snapshot.data, index.entity_key_column());

        let filter = normalize(raw_filter);
        let mut evaluator = FilterEvaluator::new(&rows, index);
        let matched = evaluator.evaluate(filter.as_ref());
        let stats = evaluator.stats();
        debug!(
            leaves = stats.leaves_evaluated,
            cache_hits = stats.cache_hits,
            unresolved = stats.unresolved_terms,
            unparseable = stats.unparseable_cells,
            "filter evaluated"
        );

        if matched.is_empty() {
            info!("filter matched no entities");
            return Ok(FilteredRowsResult::NoMatches);
        }

        let key_column = index.entity_key_column();
        let order: Vec<usize> = std::iter::once(key_column)
            .chain((0..snapshot.data.header.len()).filter(|c| *c != key_column))
            .collect();

        let columns = order
            .iter()
            .map(|c| ColumnLabel {
                label: index
                    .terms()
                    .get(*c)
                    .map(|term| term.id.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let mut matched_keys = Vec::with_capacity(matched.len());
        let mut table = Vec::with_capacity(matched.len());
        for (key, row) in rows.iter().filter(|(key, _)| matched.contains(key)) {
            matched_keys.push(key.to_string());
            table.push(
                order
                    .iter()
                    .map(|c| Cell {
                        value: rows.cell(row, *c).to_string(),
                    })
                    .collect(),
            );
        }

        info!(matched = matched_keys.len(), "filtered rows");
        Ok(FilteredRowsResult::Matched(FilteredRows {
            columns,
            rows: table,
            matched_keys,
        }))
    }

    /// Load and parse the source, reusing the cached index when the text is
    /// unchanged
    fn snapshot(&self) -> QueryResult<Snapshot> {
        let raw = self.source.load(&self.path)?;
        let fingerprint: [u8; 32] = Sha256::digest(raw.as_bytes()).into();
        let data = parse_table(&raw, self.config.delimiter)?;

        {
            let cache = match self.cache.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(cached) = cache.as_ref().filter(|c| c.fingerprint == fingerprint) {
                debug!(path = %self.path, "reusing cached term index");
                return Ok(Snapshot {
                    data,
                    index: Arc::clone(&cached.index),
                });
            }
        }

        let builder = DictionaryBuilder::with_config(self.config.clone());
        let index = Arc::new(builder.build(&data)?);
        info!(path = %self.path, terms = index.len(), "term index rebuilt");

        let mut cache = match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cache = Some(CachedIndex {
            fingerprint,
            index: Arc::clone(&index),
        });
        Ok(Snapshot { data, index })
    }
}

fn classify(term: &Term, cell: &str) -> ClassifiedValue {
    if cell.is_empty() {
        return ClassifiedValue::Undefined;
    }
    if term.is_numeric() {
        return parse_number(cell).map_or(ClassifiedValue::Undefined, ClassifiedValue::Number);
    }
    ClassifiedValue::Text(cell.to_string())
}
