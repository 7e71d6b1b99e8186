//! Position and statistics cache shared by the term list adapters.

use crate::error::{LexicoreError, Result};
use crate::storage::layout::{TermStats, decode_term_stats};

/// Statistics of the current term, decoded on first request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsCache {
    NotComputed,
    Computed(TermStats),
}

/// Where a term list is in its single forward pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermListState {
    BeforeFirst,
    Positioned { term: Vec<u8>, stats: StatsCache },
    AtEnd,
}

impl TermListState {
    pub fn term(&self) -> Result<&[u8]> {
        match self {
            TermListState::Positioned { term, .. } => Ok(term.as_slice()),
            other => Err(other.not_positioned()),
        }
    }

    fn not_positioned(&self) -> LexicoreError {
        if self.is_at_end() {
            LexicoreError::invalid_state("No current term: the term list is at its end")
        } else {
            LexicoreError::invalid_state(
                "No current term: advance() or skip_to() has not been called",
            )
        }
    }

    /// Cached statistics, decoding them from `value` on first use.
    pub fn stats<'a, F>(&mut self, value: F) -> Result<TermStats>
    where
        F: FnOnce() -> Result<&'a [u8]>,
    {
        match self {
            TermListState::Positioned {
                stats: StatsCache::Computed(stats),
                ..
            } => Ok(*stats),
            TermListState::Positioned { stats, .. } => {
                let decoded = decode_term_stats(value()?)?;
                *stats = StatsCache::Computed(decoded);
                Ok(decoded)
            }
            other => Err(other.not_positioned()),
        }
    }

    /// Whether a skip to `target` would not move forward from here.
    pub fn already_past(&self, target: &[u8]) -> bool {
        matches!(self, TermListState::Positioned { term, .. } if target <= term.as_slice())
    }

    pub fn position(&mut self, term: Vec<u8>) {
        *self = TermListState::Positioned {
            term,
            stats: StatsCache::NotComputed,
        };
    }

    pub fn finish(&mut self) {
        *self = TermListState::AtEnd;
    }

    pub fn is_at_end(&self) -> bool {
        *self == TermListState::AtEnd
    }

    pub fn is_cached(&self) -> bool {
        matches!(
            self,
            TermListState::Positioned {
                stats: StatsCache::Computed(_),
                ..
            }
        )
    }
}

/// The term to seek for a skip: never before the prefix.
pub fn skip_target<'a>(target: &'a [u8], prefix: &'a [u8]) -> &'a [u8] {
    if target < prefix { prefix } else { target }
}
