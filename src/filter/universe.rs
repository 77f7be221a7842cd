//! Entity-keyed view over a tabular snapshot

use std::collections::HashSet;

use tracing::warn;

use super::matchset::MatchSet;
use crate::source::TabularData;

/// The rows of a snapshot that carry an entity key, plus the universe of
/// those keys.
///
/// Rows with a blank key are left out. When a key repeats, its first row
/// wins.
#[derive(Debug, Clone)]
pub struct EntityRows<'a> {
    data: &'a TabularData,
    key_column: usize,
    rows: Vec<(&'a str, usize)>,
    universe: MatchSet,
}

impl<'a> EntityRows<'a> {
    pub fn new(data: &'a TabularData, key_column: usize) -> Self {
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut rows = Vec::with_capacity(data.len());
        let mut duplicates = 0usize;

        for row in 0..data.len() {
            let key = data.cell(row, key_column);
            if key.is_empty() {
                continue;
            }
            if !seen.insert(key) {
                duplicates += 1;
                continue;
            }
            rows.push((key, row));
        }

        if duplicates > 0 {
            warn!(duplicates, "repeated entity keys, keeping the first row of each");
        }

        let universe = rows.iter().map(|(key, _)| *key).collect();
        Self {
            data,
            key_column,
            rows,
            universe,
        }
    }

    /// Every entity key in the snapshot
    pub fn universe(&self) -> &MatchSet {
        &self.universe
    }

    pub fn data(&self) -> &'a TabularData {
        self.data
    }

    pub fn key_column(&self) -> usize {
        self.key_column
    }

    /// `(entity key, row index)` pairs in source order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, usize)> + '_ {
        self.rows.iter().copied()
    }

    /// Trimmed cell of `column` in the given row
    pub fn cell(&self, row: usize, column: usize) -> &'a str {
        self.data.cell(row, column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
