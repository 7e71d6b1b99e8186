//! Configuration for opening databases and scanning for spelling candidates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::layout::KeyLayout;

/// How to open a database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Key layout of the postlist table.
    pub layout: KeyLayout,
    /// Verify the table file checksum on load.
    pub verify_checksum: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            layout: KeyLayout::Chunked,
            verify_checksum: true,
        }
    }
}

impl DatabaseConfig {
    /// Set the key layout.
    pub fn with_layout(mut self, layout: KeyLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable checksum verification.
    pub fn with_verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Limits for a spelling candidate scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Maximum edit distance of a candidate.
    pub max_distance: usize,
    /// Maximum number of candidates returned.
    pub max_suggestions: usize,
    /// Minimum document frequency of a candidate.
    pub min_doc_freq: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_distance: 2,
            max_suggestions: 5,
            min_doc_freq: 1,
        }
    }
}

impl SuggestionConfig {
    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    pub fn with_min_doc_freq(mut self, min_doc_freq: u64) -> Self {
        self.min_doc_freq = min_doc_freq;
        self
    }
}
