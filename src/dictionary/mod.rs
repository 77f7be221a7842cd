//! Ad hoc term dictionary inference for delimited tabular data
//!
//! Derives a flat schema (one term per column) straight from the data, with
//! no prior metadata.
//!
//! ## Features
//!
//! - **Kind classification** - `categorical`, `integer` or `float` per column
//! - **Value enumeration** - distinct categories, with blanks kept as `"undefined"`
//! - **Default bins** - regular discretization derived from the observed range
//! - **Build statistics** - processed/skipped rows and capped columns
//!
//! ## Example
//!
//! ```rust
//! use term_dictionary_sdk::dictionary::{DictionaryBuilder, DictionaryConfig, TermKind};
//!
//! let config = DictionaryConfig::builder().entity_key_column("id").build();
//! let index = DictionaryBuilder::with_config(config)
//!     .build_from_text("id,sex,age\n1,M,10\n2,F,20\n3,F,30\n")
//!     .unwrap();
//!
//! assert_eq!(index.get("age").unwrap().kind, TermKind::Integer);
//! ```

mod builder;
mod config;
mod error;
pub mod numeric;
mod types;

pub use builder::DictionaryBuilder;
pub use config::{DictionaryConfig, DictionaryConfigBuilder};
pub use error::{DictionaryError, DictionaryResult};
pub use types::{
    BinMode, DefaultBins, DictionaryStats, FirstBin, LastBin, ROOT_TERM_ID, RootMarker, Term,
    TermIndex, TermKind, ValueLabel,
};
