//! Filter normalization and evaluation
//!
//! A filter arrives as loosely shaped JSON, is normalized into a
//! [`FilterNode`] tree, and is then evaluated against an [`EntityRows`]
//! view of a snapshot to produce the [`MatchSet`] of matching entity keys.
//!
//! ```
//! use serde_json::json;
//! use term_dictionary_sdk::dictionary::DictionaryBuilder;
//! use term_dictionary_sdk::filter::{EntityRows, evaluate, normalize};
//! use term_dictionary_sdk::source::parse_table;
//!
//! let data = parse_table("sample,sex\ns1,M\ns2,F\n", b',').unwrap();
//! let index = DictionaryBuilder::new().build(&data).unwrap();
//! let rows = EntityRows::new(&data, index.entity_key_column());
//!
//! let filter = normalize(&json!({"type": "leaf", "termId": "sex", "values": ["F"]}));
//! let matched = evaluate(filter.as_ref(), &rows, &index);
//! assert_eq!(matched.to_sorted_vec(), vec!["s2"]);
//! ```

mod evaluate;
mod matchset;
mod normalize;
mod types;
mod universe;

pub use evaluate::{EvaluationStats, FilterEvaluator, evaluate};
pub use matchset::MatchSet;
pub use normalize::{normalize, normalize_str};
pub use types::{
    Criteria, CriteriaKey, FilterNode, Join, LeafFilter, LeafKey, LeafKind, NumericInterval,
};
pub use universe::EntityRows;
