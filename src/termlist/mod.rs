//! Enumeration of every term stored in a database.
//!
//! A [`TermEnumerator`] walks the postlist table of one database snapshot in
//! term order, optionally restricted to a prefix. It starts before the first
//! term, so callers drive it with [`TermEnumerator::advance`] or
//! [`TermEnumerator::skip_to`] before reading anything, and it cannot be
//! rewound once it reaches the end.
//!
//! Two adapters implement the contract, one per [`KeyLayout`]:
//!
//! - [`ChunkedTermList`] for tables whose postings are split into chunks.
//! - [`FlatTermList`] for tables with one terminated key per term.
//!
//! [`open_all_terms`] picks the adapter matching a database's layout.

pub mod chunked;
pub mod flat;
pub mod state;

use std::borrow::Cow;
use std::sync::Arc;

use crate::database::Database;
use crate::error::{LexicoreError, Result};
use crate::storage::layout::KeyLayout;

pub use chunked::ChunkedTermList;
pub use flat::FlatTermList;

/// A term together with its collection statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The term name as stored.
    pub name: Vec<u8>,
    /// Number of documents containing the term.
    pub doc_freq: u64,
    /// Total number of occurrences of the term.
    pub coll_freq: u64,
}

impl Term {
    /// The name for display, with invalid UTF-8 replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }
}

/// Forward-only iteration over the terms of a database.
///
/// Term names are byte strings and compare as unsigned bytes. The `&str`
/// methods are views for names that happen to be UTF-8.
pub trait TermEnumerator: Send + std::fmt::Debug {
    /// The current term name.
    ///
    /// Fails with an invalid-state error unless the enumerator is positioned
    /// on a term.
    fn term_bytes(&self) -> Result<&[u8]>;

    /// The current term name as UTF-8.
    ///
    /// Names that are not UTF-8 fail with an invalid-argument error; the
    /// enumerator itself is unaffected.
    fn term(&self) -> Result<&str> {
        let name = self.term_bytes()?;
        std::str::from_utf8(name).map_err(|_| {
            LexicoreError::invalid_argument(format!(
                "Term {:?} is not valid UTF-8",
                String::from_utf8_lossy(name)
            ))
        })
    }

    /// Number of documents containing the current term.
    fn doc_freq(&mut self) -> Result<u64>;

    /// Total number of occurrences of the current term.
    fn coll_freq(&mut self) -> Result<u64>;

    /// Move to the next term. Returns `false` once the enumeration is over.
    fn advance(&mut self) -> Result<bool>;

    /// Move to the first term `>= target`, never backwards.
    ///
    /// Returns `false` (and ends the enumeration) if there is no such term.
    fn skip_to_bytes(&mut self, target: &[u8]) -> Result<bool>;

    fn skip_to(&mut self, target: &str) -> Result<bool> {
        self.skip_to_bytes(target.as_bytes())
    }

    /// Whether the enumeration is over.
    fn at_end(&self) -> bool;

    /// The current term with its statistics.
    fn current(&mut self) -> Result<Term> {
        let name = self.term_bytes()?.to_vec();
        Ok(Term {
            name,
            doc_freq: self.doc_freq()?,
            coll_freq: self.coll_freq()?,
        })
    }
}

/// Open a term enumerator over `database`, restricted to `prefix`.
///
/// An empty prefix enumerates every term.
pub fn open_all_terms(
    database: Arc<dyn Database>,
    prefix: impl AsRef<[u8]>,
) -> Result<Box<dyn TermEnumerator>> {
    let prefix = prefix.as_ref();
    Ok(match database.layout() {
        KeyLayout::Chunked => Box::new(ChunkedTermList::new(database, prefix)?),
        KeyLayout::Flat => Box::new(FlatTermList::new(database, prefix)?),
    })
}

/// Drain an enumerator, collecting every remaining term with its statistics.
pub fn collect_terms(terms: &mut dyn TermEnumerator) -> Result<Vec<Term>> {
    let mut collected = Vec::new();
    while terms.advance()? {
        collected.push(terms.current()?);
    }
    Ok(collected)
}

/// Drain an enumerator, collecting the remaining term names as stored.
pub fn collect_raw_names(terms: &mut dyn TermEnumerator) -> Result<Vec<Vec<u8>>> {
    let mut collected = Vec::new();
    while terms.advance()? {
        collected.push(terms.term_bytes()?.to_vec());
    }
    Ok(collected)
}

/// Drain an enumerator, collecting the remaining term names as UTF-8.
///
/// Stops with an invalid-argument error at the first name that is not UTF-8.
pub fn collect_names(terms: &mut dyn TermEnumerator) -> Result<Vec<String>> {
    let mut collected = Vec::new();
    while terms.advance()? {
        collected.push(terms.term()?.to_string());
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDatabase;
    use crate::storage::builder::TableBuilder;

    fn latin1_database(layout: KeyLayout) -> Arc<dyn Database> {
        let mut builder = TableBuilder::new(layout);
        builder.add_term(b"cafe", 1, 1).unwrap();
        builder.add_term(b"caf\xe9", 2, 3).unwrap();
        builder.add_term(b"d", 1, 1).unwrap();
        Arc::new(MemoryDatabase::new(builder.build(), layout))
    }

    #[test]
    fn test_latin1_terms_are_enumerated() {
        for layout in [KeyLayout::Chunked, KeyLayout::Flat] {
            let mut terms = open_all_terms(latin1_database(layout), "caf").unwrap();
            assert_eq!(
                collect_raw_names(terms.as_mut()).unwrap(),
                vec![b"cafe".to_vec(), b"caf\xe9".to_vec()]
            );

            let mut terms = open_all_terms(latin1_database(layout), b"caf\xe9").unwrap();
            let listed = collect_terms(terms.as_mut()).unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].doc_freq, 2);
            assert_eq!(listed[0].name_lossy(), "caf\u{fffd}");
        }
    }

    #[test]
    fn test_str_view_rejects_latin1_without_ending() {
        for layout in [KeyLayout::Chunked, KeyLayout::Flat] {
            let mut terms = open_all_terms(latin1_database(layout), "").unwrap();
            assert!(terms.skip_to_bytes(b"caf\xe9").unwrap());
            assert!(terms.term().unwrap_err().is_invalid_argument());
            assert_eq!(terms.coll_freq().unwrap(), 3);

            assert!(terms.advance().unwrap());
            assert_eq!(terms.term().unwrap(), "d");

            let mut terms = open_all_terms(latin1_database(layout), "").unwrap();
            assert!(collect_names(terms.as_mut()).unwrap_err().is_invalid_argument());
        }
    }
}
