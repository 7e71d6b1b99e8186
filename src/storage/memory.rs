//! In-memory sorted table and its cursor.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{LexicoreError, Result};
use crate::storage::traits::Cursor;

/// An immutable sorted key/value table held in memory.
///
/// Tables are snapshots: once built they are shared read-only through an
/// `Arc`, and every cursor keeps its own handle on the snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MemoryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        MemoryTable {
            entries: Vec::new(),
        }
    }

    /// Build a table from a map; keys come out in sorted order.
    pub fn from_map(map: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        MemoryTable {
            entries: map.into_iter().collect(),
        }
    }

    /// Build a table from entries that must already be strictly ascending.
    pub fn from_sorted(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Result<Self> {
        if let Some(index) = entries.windows(2).position(|pair| pair[0].0 >= pair[1].0) {
            return Err(LexicoreError::corruption(format!(
                "Table keys out of order at entry {}",
                index + 1
            )));
        }
        Ok(MemoryTable { entries })
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries
            .binary_search_by(|(entry_key, _)| entry_key.as_slice().cmp(key))
            .ok()
            .map(|index| self.entries[index].1.as_slice())
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_slice(), value.as_slice()))
    }

    /// Open a cursor over a shared table.
    pub fn cursor(self: &Arc<Self>) -> MemoryCursor {
        MemoryCursor {
            table: Arc::clone(self),
            position: Position::BeforeFirst,
        }
    }

    fn count_le(&self, key: &[u8]) -> usize {
        self.entries.partition_point(|(entry_key, _)| entry_key.as_slice() <= key)
    }

    fn count_lt(&self, key: &[u8]) -> usize {
        self.entries.partition_point(|(entry_key, _)| entry_key.as_slice() < key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    AfterEnd,
}

/// Cursor over a [`MemoryTable`].
#[derive(Debug)]
pub struct MemoryCursor {
    table: Arc<MemoryTable>,
    position: Position,
}

impl MemoryCursor {
    fn entry(&self) -> Option<&(Vec<u8>, Vec<u8>)> {
        match self.position {
            Position::At(index) => self.table.entries.get(index),
            _ => None,
        }
    }
}

impl Cursor for MemoryCursor {
    fn find_entry(&mut self, key: &[u8]) -> Result<bool> {
        let count = self.table.count_le(key);
        if count == 0 {
            self.position = Position::BeforeFirst;
            return Ok(false);
        }
        self.position = Position::At(count - 1);
        Ok(self.table.entries[count - 1].0 == key)
    }

    fn find_entry_lt(&mut self, key: &[u8]) -> Result<()> {
        self.position = match self.table.count_lt(key) {
            0 => Position::BeforeFirst,
            count => Position::At(count - 1),
        };
        Ok(())
    }

    fn find_entry_ge(&mut self, key: &[u8]) -> Result<bool> {
        let index = self.table.count_lt(key);
        match self.table.entries.get(index) {
            Some((found, _)) => {
                self.position = Position::At(index);
                Ok(found.as_slice() == key)
            }
            None => {
                self.position = Position::AfterEnd;
                Ok(false)
            }
        }
    }

    fn next(&mut self) -> Result<bool> {
        let next_index = match self.position {
            Position::BeforeFirst => 0,
            Position::At(index) => index + 1,
            Position::AfterEnd => return Ok(false),
        };
        self.position = if next_index < self.table.len() {
            Position::At(next_index)
        } else {
            Position::AfterEnd
        };
        Ok(self.position != Position::AfterEnd)
    }

    fn current_key(&self) -> &[u8] {
        self.entry().map(|(key, _)| key.as_slice()).unwrap_or(&[])
    }

    fn current_value(&self) -> Result<&[u8]> {
        self.entry()
            .map(|(_, value)| value.as_slice())
            .ok_or_else(|| LexicoreError::invalid_state("Cursor is not on an entry"))
    }

    fn after_end(&self) -> bool {
        self.position == Position::AfterEnd
    }

    fn to_end(&mut self) {
        self.position = Position::AfterEnd;
    }
}
