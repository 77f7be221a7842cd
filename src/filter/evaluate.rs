//! Filter evaluation against an entity-keyed snapshot

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matchset::MatchSet;
use super::types::{Criteria, FilterNode, Join, LeafFilter, LeafKey, LeafKind};
use super::universe::EntityRows;
use crate::dictionary::TermIndex;
use crate::dictionary::numeric::parse_number;

/// Counters collected during one evaluation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationStats {
    /// Leaves that required a row scan
    pub leaves_evaluated: usize,
    /// Leaves answered from the per-call cache
    pub cache_hits: usize,
    /// Leaves whose term was absent or of a different kind
    pub unresolved_terms: usize,
    /// Non-blank cells that did not parse under a numeric leaf
    pub unparseable_cells: usize,
}

/// Evaluates filter trees against one snapshot.
///
/// Leaf results are memoized for the lifetime of the evaluator, which is
/// bound to a single snapshot; build a new evaluator for new data.
pub struct FilterEvaluator<'a> {
    rows: &'a EntityRows<'a>,
    index: &'a TermIndex,
    cache: HashMap<LeafKey, MatchSet>,
    stats: EvaluationStats,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(rows: &'a EntityRows<'a>, index: &'a TermIndex) -> Self {
        Self {
            rows,
            index,
            cache: HashMap::new(),
            stats: EvaluationStats::default(),
        }
    }

    pub fn stats(&self) -> EvaluationStats {
        self.stats
    }

    /// Evaluate `node`; `None` means no restriction and yields the universe
    pub fn evaluate(&mut self, node: Option<&FilterNode>) -> MatchSet {
        match node {
            None => self.rows.universe().clone(),
            Some(node) => self.evaluate_node(node),
        }
    }

    fn evaluate_node(&mut self, node: &FilterNode) -> MatchSet {
        match node {
            FilterNode::Group {
                join,
                negate,
                children,
            } => {
                let combined = self.evaluate_group(*join, children);
                if *negate {
                    combined.complement_in(self.rows.universe())
                } else {
                    combined
                }
            }
            FilterNode::Leaf(leaf) => self.evaluate_leaf(leaf),
        }
    }

    /// Combine children left to right, seeded by the first child.
    /// A group without children matches nothing.
    fn evaluate_group(&mut self, join: Join, children: &[FilterNode]) -> MatchSet {
        let mut children = children.iter();
        let Some(first) = children.next() else {
            return MatchSet::new();
        };

        let mut acc = self.evaluate_node(first);
        for child in children {
            if join == Join::And && acc.is_empty() {
                break;
            }
            let result = self.evaluate_node(child);
            acc = match join {
                Join::And => acc.intersect(result),
                Join::Or => acc.union(result),
            };
        }
        acc
    }

    fn evaluate_leaf(&mut self, leaf: &LeafFilter) -> MatchSet {
        let key = leaf.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            debug!(term = %leaf.term_id, "leaf cache hit");
            return hit.clone();
        }

        let result = self.scan_leaf(leaf);
        self.cache.insert(key, result.clone());
        result
    }

    fn scan_leaf(&mut self, leaf: &LeafFilter) -> MatchSet {
        self.stats.leaves_evaluated += 1;

        let Some(term) = self.index.get(&leaf.term_id) else {
            self.stats.unresolved_terms += 1;
            debug!(term = %leaf.term_id, "filter references an unknown term");
            return MatchSet::new();
        };

        let kind_matches = match leaf.kind() {
            LeafKind::Categorical => !term.is_numeric(),
            LeafKind::Numeric => term.is_numeric(),
        };
        if !kind_matches {
            self.stats.unresolved_terms += 1;
            debug!(
                term = %leaf.term_id,
                term_kind = %term.kind,
                leaf_kind = ?leaf.kind(),
                "filter kind does not match term kind"
            );
            return MatchSet::new();
        }

        let column = term.column_index;
        let mut matched = MatchSet::new();

        match &leaf.criteria {
            Criteria::Values(values) => {
                let undefined = self.index.undefined_label();
                for (key, row) in self.rows.iter() {
                    let cell = self.rows.cell(row, column);
                    let value = if cell.is_empty() { undefined } else { cell };
                    if values.contains(value) {
                        matched.insert(key);
                    }
                }
            }
            Criteria::Ranges(ranges) => {
                for (key, row) in self.rows.iter() {
                    let cell = self.rows.cell(row, column);
                    let Some(x) = parse_number(cell) else {
                        if !cell.is_empty() {
                            self.stats.unparseable_cells += 1;
                        }
                        continue;
                    };
                    if ranges.iter().any(|r| r.contains(x)) {
                        matched.insert(key);
                    }
                }
            }
        }

        debug!(
            term = %leaf.term_id,
            matched = matched.len(),
            negate = leaf.negate,
            "evaluated filter leaf"
        );

        if leaf.negate {
            matched.complement_in(self.rows.universe())
        } else {
            matched
        }
    }
}

/// Evaluate `node` against `rows` with a fresh leaf cache
pub fn evaluate(node: Option<&FilterNode>, rows: &EntityRows<'_>, index: &TermIndex) -> MatchSet {
    FilterEvaluator::new(rows, index).evaluate(node)
}
