//! Spelling candidates drawn from the terms of a database.

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SuggestionConfig;
use crate::error::Result;
use crate::termlist::TermEnumerator;
use crate::util::levenshtein::LevenshteinMatcher;

/// A stored term close to the word being corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested term.
    pub word: String,
    /// Edit distance from the original word.
    pub distance: usize,
    /// Number of documents containing the term.
    pub doc_freq: u64,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(word: String, distance: usize, doc_freq: u64) -> Self {
        Suggestion {
            word,
            distance,
            doc_freq,
        }
    }
}

impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Closest first, then most common, then alphabetical
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.doc_freq.cmp(&self.doc_freq))
            .then_with(|| self.word.cmp(&other.word))
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Scan `terms` for spelling candidates of `word`.
///
/// Terms within `max_distance` edits and with at least `min_doc_freq`
/// documents are returned best first. If `word` itself is stored it is the
/// only suggestion.
pub fn suggest(
    terms: &mut dyn TermEnumerator,
    word: &str,
    config: &SuggestionConfig,
) -> Result<Vec<Suggestion>> {
    let matcher = LevenshteinMatcher::new(word);
    let mut suggestions = Vec::new();
    let mut scanned = 0usize;

    while terms.advance()? {
        scanned += 1;
        // Names that are not UTF-8 cannot be a respelling of `word`.
        let Ok(name) = std::str::from_utf8(terms.term_bytes()?) else {
            continue;
        };
        let Some(distance) = matcher.distance_within(name, config.max_distance) else {
            continue;
        };
        let doc_freq = terms.doc_freq()?;
        if doc_freq < config.min_doc_freq {
            continue;
        }
        if distance == 0 {
            debug!("{word:?} is a stored term");
            return Ok(vec![Suggestion::new(word.to_string(), 0, doc_freq)]);
        }
        suggestions.push(Suggestion::new(terms.term()?.to_string(), distance, doc_freq));
    }

    suggestions.sort();
    suggestions.truncate(config.max_suggestions);
    debug!(
        "{} suggestions for {word:?} from {scanned} terms",
        suggestions.len()
    );
    Ok(suggestions)
}
