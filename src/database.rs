//! Databases that term enumerators read from.

use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::storage::file::{read_table, write_table};
use crate::storage::layout::KeyLayout;
use crate::storage::memory::MemoryTable;
use crate::storage::traits::Cursor;
use crate::termlist::{TermEnumerator, open_all_terms};

/// A database snapshot exposing its postlist table.
///
/// Term enumerators share a database through an `Arc` and only ever read it.
pub trait Database: Send + Sync + std::fmt::Debug {
    /// The key layout of the postlist table.
    fn layout(&self) -> KeyLayout;

    /// Open a new cursor over the postlist table.
    fn postlist_cursor(&self) -> Result<Box<dyn Cursor>>;
}

impl dyn Database {
    /// Enumerate the terms of this database starting with `prefix`.
    pub fn all_terms(
        self: Arc<Self>,
        prefix: impl AsRef<[u8]>,
    ) -> Result<Box<dyn TermEnumerator>> {
        open_all_terms(self, prefix)
    }
}

/// A database whose postlist table is held in memory.
#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    table: Arc<MemoryTable>,
    layout: KeyLayout,
}

impl MemoryDatabase {
    /// Create a database over an existing table.
    pub fn new(table: MemoryTable, layout: KeyLayout) -> Self {
        MemoryDatabase {
            table: Arc::new(table),
            layout,
        }
    }

    /// Load a table file written by [`MemoryDatabase::save`].
    pub fn open<P: AsRef<Path>>(path: P, config: &DatabaseConfig) -> Result<Self> {
        let path = path.as_ref();
        let table = read_table(path, config.verify_checksum)?;
        debug!(
            "opened {} database at {} ({} entries)",
            config.layout.name(),
            path.display(),
            table.len()
        );
        Ok(MemoryDatabase::new(table, config.layout))
    }

    /// Write the postlist table to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_table(path, &self.table)
    }

    /// Get the postlist table.
    pub fn table(&self) -> &Arc<MemoryTable> {
        &self.table
    }
}

impl Database for MemoryDatabase {
    fn layout(&self) -> KeyLayout {
        self.layout
    }

    fn postlist_cursor(&self) -> Result<Box<dyn Cursor>> {
        Ok(Box::new(self.table.cursor()))
    }
}
