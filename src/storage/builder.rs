//! Builder for postlist tables.

use std::collections::BTreeMap;

use crate::error::{LexicoreError, Result};
use crate::storage::layout::{
    KeyLayout, METADATA_PREFIX, SENTINEL, TermStats, chunk_key, encode_term_stats,
};
use crate::storage::memory::MemoryTable;
use crate::util::varint::encode_u64;

/// Format version stored in the reserved entry of flat tables.
const FLAT_FORMAT_VERSION: u64 = 1;

/// Builds a postlist table in a given key layout.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    layout: KeyLayout,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl TableBuilder {
    /// Create a new builder.
    pub fn new(layout: KeyLayout) -> Self {
        let mut entries = BTreeMap::new();
        if layout == KeyLayout::Flat {
            entries.insert(SENTINEL.to_vec(), encode_u64(FLAT_FORMAT_VERSION));
        }
        TableBuilder { layout, entries }
    }

    /// Get the layout being built.
    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Add a term with its statistics.
    pub fn add_term(
        &mut self,
        term: impl AsRef<[u8]>,
        doc_freq: u64,
        coll_freq: u64,
    ) -> Result<()> {
        self.add_term_with_postings(term, TermStats::new(doc_freq, coll_freq), &[])
    }

    /// Add a term whose entry value carries statistics followed by postings.
    pub fn add_term_with_postings(
        &mut self,
        term: impl AsRef<[u8]>,
        stats: TermStats,
        postings: &[u8],
    ) -> Result<()> {
        let term = term.as_ref();
        if term.is_empty() {
            return Err(LexicoreError::invalid_argument("Empty term name"));
        }
        let mut value = encode_term_stats(stats);
        value.extend_from_slice(postings);
        self.entries.insert(self.layout.term_key(term), value);
        Ok(())
    }

    /// Add a continuation chunk of `term`'s postings starting at `first_docid`.
    pub fn add_chunk(
        &mut self,
        term: impl AsRef<[u8]>,
        first_docid: u64,
        payload: &[u8],
    ) -> Result<()> {
        let term = term.as_ref();
        if self.layout != KeyLayout::Chunked {
            return Err(LexicoreError::invalid_argument(format!(
                "The {} layout has no continuation chunks",
                self.layout.name()
            )));
        }
        if term.is_empty() {
            return Err(LexicoreError::invalid_argument("Empty term name"));
        }
        self.entries
            .insert(chunk_key(term, first_docid), payload.to_vec());
        Ok(())
    }

    /// Add a metadata entry in the reserved key region.
    pub fn add_metadata(&mut self, name: &[u8], value: &[u8]) {
        let mut key = METADATA_PREFIX.to_vec();
        key.extend_from_slice(name);
        self.entries.insert(key, value.to_vec());
    }

    /// Get the number of entries so far, reserved ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish the table.
    pub fn build(self) -> MemoryTable {
        MemoryTable::from_map(self.entries)
    }
}
