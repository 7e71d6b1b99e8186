//! Postlist table key layouts and the term statistics codec.
//!
//! Every key below [`SENTINEL`] belongs to the storage layer (metadata, value
//! statistics and the like). Term keys are packed with the sort-preserving
//! string packing, so a term starting with a zero byte packs to `00 FF ..` and
//! still lands at or above the sentinel.

use serde::{Deserialize, Serialize};

use crate::error::{LexicoreError, Result};
use crate::util::sortable::{
    pack_string_preserving_sort, pack_uint_preserving_sort, unpack_string_preserving_sort,
    unpack_uint_preserving_sort,
};
use crate::util::varint::{encode_u64, take_u64};

/// Boundary between the reserved metadata region and term keys.
pub const SENTINEL: &[u8] = b"\x00\xff";

/// Prefix of user metadata keys.
pub const METADATA_PREFIX: &[u8] = b"\x00\xc0";

/// How a backend lays out term keys in its postlist table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLayout {
    /// Postings split into chunks; the first chunk is keyed by the bare packed
    /// term and continuation chunks append a terminator and the first docid.
    #[default]
    Chunked,
    /// One entry per term keyed by the terminated packed term. The sentinel
    /// key itself is stored as a reserved entry.
    Flat,
}

impl KeyLayout {
    /// Get a human-readable name for the layout.
    pub fn name(&self) -> &'static str {
        match self {
            KeyLayout::Chunked => "chunked",
            KeyLayout::Flat => "flat",
        }
    }

    /// Encode the key of a term's (first) entry.
    pub fn term_key(&self, term: impl AsRef<[u8]>) -> Vec<u8> {
        let term = term.as_ref();
        let mut key = Vec::with_capacity(term.len() + 1);
        pack_string_preserving_sort(&mut key, term, *self == KeyLayout::Chunked);
        key
    }
}

impl std::str::FromStr for KeyLayout {
    type Err = LexicoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chunked" => Ok(KeyLayout::Chunked),
            "flat" => Ok(KeyLayout::Flat),
            other => Err(LexicoreError::invalid_argument(format!(
                "Unknown key layout: {other}"
            ))),
        }
    }
}

/// Key of a continuation chunk in the chunked layout.
pub fn chunk_key(term: impl AsRef<[u8]>, first_docid: u64) -> Vec<u8> {
    let term = term.as_ref();
    let mut key = Vec::with_capacity(term.len() + 10);
    pack_string_preserving_sort(&mut key, term, false);
    pack_uint_preserving_sort(&mut key, first_docid);
    key
}

/// What a postlist table key refers to. Term names are raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedKey {
    /// The entry that carries a term's statistics.
    Term(Vec<u8>),
    /// A continuation chunk of the named term's postings.
    Continuation(Vec<u8>),
}

/// Decode a term key under `layout`.
///
/// Any structural problem is reported as corruption: keys at or above the
/// sentinel are written by the index and must decode. The term bytes
/// themselves are never inspected.
pub fn decode_term_key(layout: KeyLayout, key: &[u8]) -> Result<DecodedKey> {
    let (term, terminated, rest) = unpack_string_preserving_sort(key);

    match layout {
        KeyLayout::Chunked if !terminated => Ok(DecodedKey::Term(term)),
        KeyLayout::Chunked => {
            let (_, trailing) = unpack_uint_preserving_sort(rest)?;
            if !trailing.is_empty() {
                return Err(LexicoreError::corruption(
                    "Trailing bytes after chunk document id",
                ));
            }
            Ok(DecodedKey::Continuation(term))
        }
        KeyLayout::Flat if terminated && rest.is_empty() => Ok(DecodedKey::Term(term)),
        KeyLayout::Flat => Err(LexicoreError::corruption(
            "Flat term key is not a single terminated term",
        )),
    }
}

/// Per-term statistics stored at the front of a term entry's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TermStats {
    /// Number of documents containing the term.
    pub doc_freq: u64,
    /// Total number of occurrences across the collection.
    pub coll_freq: u64,
}

impl TermStats {
    /// Create new term statistics.
    pub fn new(doc_freq: u64, coll_freq: u64) -> Self {
        TermStats {
            doc_freq,
            coll_freq,
        }
    }
}

/// Encode statistics as the header of a term entry's value.
pub fn encode_term_stats(stats: TermStats) -> Vec<u8> {
    let mut value = encode_u64(stats.doc_freq);
    value.extend(encode_u64(stats.coll_freq));
    value
}

/// Decode the statistics header of a term entry's value.
///
/// Bytes after the two counts belong to the postings and are ignored.
pub fn decode_term_stats(value: &[u8]) -> Result<TermStats> {
    let mut input = value;
    let doc_freq = take_u64(&mut input)
        .map_err(|e| LexicoreError::corruption(format!("Bad term frequency: {e}")))?;
    let coll_freq = take_u64(&mut input)
        .map_err(|e| LexicoreError::corruption(format!("Bad collection frequency: {e}")))?;
    Ok(TermStats::new(doc_freq, coll_freq))
}
