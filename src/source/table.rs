//! Delimited text parsing into an in-memory row snapshot

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::{SourceError, SourceResult};

/// A parsed tabular snapshot: one header row plus data rows.
///
/// Every data row has exactly `header.len()` cells. Short rows are padded
/// with blanks and long rows are truncated when the snapshot is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Build a snapshot from already split rows, normalizing row widths
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { header, rows }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trimmed cell text, or "" when the position is out of range
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|c| c.trim())
            .unwrap_or("")
    }
}

/// Parse delimited text into a [`TabularData`] snapshot.
///
/// The first non-blank line is the header. Quoted fields may contain the
/// delimiter. Lines holding only whitespace are skipped.
pub fn parse_table(raw: &str, delimiter: u8) -> SourceResult<TabularData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(Trim::None)
        .from_reader(raw.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| SourceError::Parse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;

        if is_blank_record(&record) {
            continue;
        }

        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        match header {
            None => header = Some(cells),
            Some(_) => rows.push(cells),
        }
    }

    let header = header.unwrap_or_default();
    debug!(columns = header.len(), rows = rows.len(), "parsed tabular text");
    Ok(TabularData::new(header, rows))
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}
