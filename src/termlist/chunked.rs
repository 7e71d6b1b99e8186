//! Term list over a chunked postlist table.

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::database::Database;
use crate::error::{LexicoreError, Result};
use crate::storage::layout::{DecodedKey, KeyLayout, SENTINEL, decode_term_key};
use crate::storage::traits::Cursor;
use crate::termlist::TermEnumerator;
use crate::termlist::state::{TermListState, skip_target};

/// Enumerates the terms of a database laid out as [`KeyLayout::Chunked`].
///
/// Only the first chunk of each postlist carries the term's statistics, so
/// continuation chunks are stepped over while advancing.
#[derive(Debug)]
pub struct ChunkedTermList {
    /// Held so the database outlives the cursor.
    _database: Arc<dyn Database>,
    cursor: Box<dyn Cursor>,
    prefix: Vec<u8>,
    state: TermListState,
}

impl ChunkedTermList {
    /// Create a term list restricted to `prefix` (empty for all terms).
    ///
    /// The cursor is left on the greatest key below the first key that could
    /// match, so the first `advance()` lands on the first wanted term.
    pub fn new(database: Arc<dyn Database>, prefix: &[u8]) -> Result<Self> {
        let mut cursor = database.postlist_cursor()?;
        if prefix.is_empty() {
            cursor.find_entry_lt(SENTINEL)?;
        } else {
            cursor.find_entry_lt(&KeyLayout::Chunked.term_key(prefix))?;
        }
        debug!(
            "chunked term list opened with prefix {:?}",
            String::from_utf8_lossy(prefix)
        );

        Ok(ChunkedTermList {
            _database: database,
            cursor,
            prefix: prefix.to_vec(),
            state: TermListState::BeforeFirst,
        })
    }

    /// Settle on the first term at or after the cursor.
    fn settle(&mut self) -> Result<bool> {
        let term = loop {
            if self.cursor.after_end() {
                self.state.finish();
                return Ok(false);
            }
            let decoded = decode_term_key(KeyLayout::Chunked, self.cursor.current_key())
                .inspect_err(|e| warn!("corrupt postlist key: {e}"))?;
            match decoded {
                DecodedKey::Term(term) => break term,
                DecodedKey::Continuation(term) => {
                    trace!(
                        "skipping continuation chunk of {:?}",
                        String::from_utf8_lossy(&term)
                    );
                    self.cursor.next()?;
                }
            }
        };

        if term.starts_with(&self.prefix) {
            self.state.position(term);
            Ok(true)
        } else {
            self.cursor.to_end();
            self.state.finish();
            Ok(false)
        }
    }
}

impl TermEnumerator for ChunkedTermList {
    fn term_bytes(&self) -> Result<&[u8]> {
        self.state.term()
    }

    fn doc_freq(&mut self) -> Result<u64> {
        let cursor = &self.cursor;
        Ok(self.state.stats(|| cursor.current_value())?.doc_freq)
    }

    fn coll_freq(&mut self) -> Result<u64> {
        let cursor = &self.cursor;
        Ok(self.state.stats(|| cursor.current_value())?.coll_freq)
    }

    fn advance(&mut self) -> Result<bool> {
        if self.state.is_at_end() {
            return Err(LexicoreError::invalid_state(
                "advance() called after the end of the term list",
            ));
        }
        self.cursor.next()?;
        self.settle()
    }

    fn skip_to_bytes(&mut self, target: &[u8]) -> Result<bool> {
        if self.state.is_at_end() {
            return Ok(false);
        }
        if self.state.already_past(target) {
            return Ok(true);
        }

        let key = KeyLayout::Chunked.term_key(skip_target(target, &self.prefix));
        if key.as_slice() < SENTINEL {
            self.cursor.find_entry_ge(SENTINEL)?;
        } else {
            self.cursor.find_entry_ge(&key)?;
        }
        self.settle()
    }

    fn at_end(&self) -> bool {
        self.state.is_at_end()
    }
}
