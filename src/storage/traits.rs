//! Cursor abstraction over sorted key/value tables.

use crate::error::Result;

/// An ordered cursor over a sorted key/value table.
///
/// Keys and values are opaque byte strings; keys compare bytewise. Besides
/// being on an entry, a cursor can sit before the first entry (the state after
/// seeking below the smallest key) or after the last one.
pub trait Cursor: Send + std::fmt::Debug {
    /// Position on the entry with the greatest key `<= key`.
    ///
    /// Returns `true` if that entry's key equals `key`. If every key is
    /// greater than `key` the cursor is left before the first entry.
    fn find_entry(&mut self, key: &[u8]) -> Result<bool>;

    /// Position on the entry with the greatest key `< key`, or before the
    /// first entry if there is none.
    fn find_entry_lt(&mut self, key: &[u8]) -> Result<()>;

    /// Position on the entry with the smallest key `>= key`.
    ///
    /// Returns `true` on an exact match. If there is no such entry the cursor
    /// is moved after the end.
    fn find_entry_ge(&mut self, key: &[u8]) -> Result<bool>;

    /// Move to the next entry. Returns `false` once the cursor is after the end.
    fn next(&mut self) -> Result<bool>;

    /// Key of the current entry. Empty when not on an entry.
    fn current_key(&self) -> &[u8];

    /// Value of the current entry.
    fn current_value(&self) -> Result<&[u8]>;

    /// Whether the cursor has moved past the last entry.
    fn after_end(&self) -> bool;

    /// Move the cursor after the end of the table.
    fn to_end(&mut self);
}
