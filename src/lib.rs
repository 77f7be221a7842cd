//! Term Dictionary SDK - schema inference and cohort filtering over
//! delimited tabular files
//!
//! Provides:
//! - Tabular sources (filesystem, in-memory) and CSV parsing
//! - Term dictionary inference (categorical, integer and float terms with
//!   default bins)
//! - Filter normalization from canonical and legacy filter shapes
//! - Filter evaluation with per-leaf caching
//! - A query façade tying the pieces together over one source file

pub mod dictionary;
pub mod filter;
pub mod query;
pub mod source;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use dictionary::{
    DictionaryBuilder, DictionaryConfig, DictionaryError, DictionaryResult, Term, TermIndex,
    TermKind,
};
pub use filter::{
    EntityRows, FilterEvaluator, FilterNode, LeafFilter, MatchSet, evaluate, normalize,
};
pub use query::{FilteredRowsResult, QueryError, QueryResult, TermDictionary};
pub use source::{
    FileSystemSource, InMemorySource, SourceError, SourceResult, TabularData, TabularSource,
};
