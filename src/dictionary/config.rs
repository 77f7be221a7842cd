//! Configuration for dictionary building

use serde::{Deserialize, Serialize};

/// Configuration for dictionary building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryConfig {
    /// Header label of the entity key column (matched case-insensitively)
    pub entity_key_column: String,

    /// Field delimiter of the source text
    pub delimiter: u8,

    /// Number of regular bins the default bin width is derived from
    pub bin_count: usize,

    /// Maximum distinct values tracked per column (0 = unlimited)
    pub max_distinct_values: usize,

    /// Category that stands in for blank cells
    pub undefined_label: String,

    /// Character replaced by a space when deriving a term's display name
    pub name_separator: char,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            entity_key_column: "sample".to_string(),
            delimiter: b',',
            bin_count: 5,
            max_distinct_values: 0,
            undefined_label: "undefined".to_string(),
            name_separator: '_',
        }
    }
}

impl DictionaryConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> DictionaryConfigBuilder {
        DictionaryConfigBuilder::default()
    }

    /// Parse a configuration from TOML text; absent keys keep their defaults
    #[cfg(feature = "cli")]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a TOML configuration file
    #[cfg(feature = "cli")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Builder for DictionaryConfig
#[derive(Debug, Default)]
pub struct DictionaryConfigBuilder {
    config: DictionaryConfig,
}

impl DictionaryConfigBuilder {
    /// Set the entity key column label
    pub fn entity_key_column(mut self, label: impl Into<String>) -> Self {
        self.config.entity_key_column = label.into();
        self
    }

    /// Set the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the number of default bins (at least 1)
    pub fn bin_count(mut self, count: usize) -> Self {
        self.config.bin_count = count.max(1);
        self
    }

    /// Cap the distinct values tracked per column (0 = unlimited)
    pub fn max_distinct_values(mut self, max: usize) -> Self {
        self.config.max_distinct_values = max;
        self
    }

    /// Set the category used for blank cells
    pub fn undefined_label(mut self, label: impl Into<String>) -> Self {
        self.config.undefined_label = label.into();
        self
    }

    /// Set the separator replaced in display names
    pub fn name_separator(mut self, separator: char) -> Self {
        self.config.name_separator = separator;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DictionaryConfig {
        self.config
    }
}
