//! Term list over a flat postlist table.

use std::sync::Arc;

use log::{debug, warn};

use crate::database::Database;
use crate::error::{LexicoreError, Result};
use crate::storage::layout::{DecodedKey, KeyLayout, SENTINEL, decode_term_key};
use crate::storage::traits::Cursor;
use crate::termlist::TermEnumerator;
use crate::termlist::state::{TermListState, skip_target};

/// Enumerates the terms of a database laid out as [`KeyLayout::Flat`].
///
/// Seeks use exact-match lookups: when the seek key names a stored term the
/// cursor already sits on the wanted entry, otherwise the next entry is the
/// wanted one. The reserved sentinel entry is stepped over the same way.
#[derive(Debug)]
pub struct FlatTermList {
    /// Held so the database outlives the cursor.
    _database: Arc<dyn Database>,
    cursor: Box<dyn Cursor>,
    prefix: Vec<u8>,
    state: TermListState,
    /// The cursor is already on the first wanted entry.
    pending: bool,
}

impl FlatTermList {
    /// Create a term list restricted to `prefix` (empty for all terms).
    pub fn new(database: Arc<dyn Database>, prefix: &[u8]) -> Result<Self> {
        let mut cursor = database.postlist_cursor()?;
        let pending = seek(cursor.as_mut(), prefix)?;
        debug!(
            "flat term list opened with prefix {:?}",
            String::from_utf8_lossy(prefix)
        );

        Ok(FlatTermList {
            _database: database,
            cursor,
            prefix: prefix.to_vec(),
            state: TermListState::BeforeFirst,
            pending,
        })
    }

    /// Settle on the first term at or after the cursor.
    fn settle(&mut self) -> Result<bool> {
        while !self.cursor.after_end() && self.cursor.current_key() <= SENTINEL {
            self.cursor.next()?;
        }
        if self.cursor.after_end() {
            self.state.finish();
            return Ok(false);
        }

        let term = match decode_term_key(KeyLayout::Flat, self.cursor.current_key())
            .inspect_err(|e| warn!("corrupt postlist key: {e}"))?
        {
            DecodedKey::Term(term) => term,
            DecodedKey::Continuation(term) => {
                return Err(LexicoreError::corruption(format!(
                    "Continuation chunk for {:?} in a flat table",
                    String::from_utf8_lossy(&term)
                )));
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

/// Position `cursor` for a scan starting at `term`.
///
/// Returns `true` when the cursor landed exactly on that term's entry.
fn seek(cursor: &mut dyn Cursor, term: &[u8]) -> Result<bool> {
    let key = KeyLayout::Flat.term_key(term);
    if key.as_slice() <= SENTINEL {
        cursor.find_entry(SENTINEL)?;
        return Ok(false);
    }
    cursor.find_entry(&key)
}

impl TermEnumerator for FlatTermList {
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
        if self.pending {
            self.pending = false;
        } else {
            self.cursor.next()?;
        }
        self.settle()
    }

    fn skip_to_bytes(&mut self, target: &[u8]) -> Result<bool> {
        if self.state.is_at_end() {
            return Ok(false);
        }
        if self.state.already_past(target) {
            return Ok(true);
        }

        self.pending = false;
        if !seek(self.cursor.as_mut(), skip_target(target, &self.prefix))? {
            self.cursor.next()?;
        }
        self.settle()
    }

    fn at_end(&self) -> bool {
        self.state.is_at_end()
    }
}
