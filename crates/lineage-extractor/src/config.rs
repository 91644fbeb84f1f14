//! Configuration for the Extractor

use crate::locale::{Locale, DEFAULT_LOCALE};
use lineage_document::{EncodingChain, DEFAULT_ENCODINGS};
use serde::{Deserialize, Serialize};

/// Configuration for extraction runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Documentation language of the corpus (`pt-BR`, `en-US`)
    pub locale: String,

    /// Size of the batch worker pool
    pub workers: usize,

    /// Parse every document in the corpus before extracting
    pub preload_all: bool,

    /// Encoding labels tried in order when decoding documents
    pub encodings: Vec<String>,

    /// Minimum score for a fuzzy name match to be accepted
    pub fuzzy_threshold: f64,

    /// How many tables after a header are searched for a template table
    pub template_search_window: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be greater than 0".to_string());
        }
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 2.0) {
            return Err("fuzzy_threshold must be in (0, 2]".to_string());
        }
        if self.template_search_window == 0 {
            return Err("template_search_window must be greater than 0".to_string());
        }
        if self.encodings.is_empty() {
            return Err("encodings must list at least one encoding".to_string());
        }
        self.encoding_chain()?;
        self.locale()?;
        Ok(())
    }

    /// Resolve the configured locale table
    pub fn locale(&self) -> Result<&'static Locale, String> {
        Locale::by_code(&self.locale).ok_or_else(|| format!("Unknown locale: {}", self.locale))
    }

    /// Build the encoding fallback chain
    pub fn encoding_chain(&self) -> Result<EncodingChain, String> {
        EncodingChain::from_labels(&self.encodings).map_err(|e| e.to_string())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            workers: 4,
            preload_all: false,
            encodings: DEFAULT_ENCODINGS.iter().map(|s| s.to_string()).collect(),
            fuzzy_threshold: 0.8,
            template_search_window: 10,
        }
    }
}

impl ExtractorConfig {
    /// Sequential preset: a single worker, nothing pre-warmed beyond indexes
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }

    /// Aggressive preset: more workers and the whole corpus pre-warmed
    pub fn aggressive() -> Self {
        Self {
            workers: 8,
            preload_all: true,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
