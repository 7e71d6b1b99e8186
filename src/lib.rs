//! # lexicore
//!
//! The storage-access and query-representation core of a full-text search
//! engine.
//!
//! ## Features
//!
//! - Term enumeration over sorted postlist tables, with prefix restriction
//!   and forward skipping, for chunked and flat key layouts
//! - Query trees of boolean and proximity operators with collapsing,
//!   reversible serialisation and term extraction
//! - Spelling candidates drawn from the stored terms

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod query;
pub mod spelling;
pub mod storage;
pub mod termlist;
pub mod util;

pub mod prelude {
    pub use crate::config::{DatabaseConfig, SuggestionConfig};
    pub use crate::database::{Database, MemoryDatabase};
    pub use crate::error::{LexicoreError, Result};
    pub use crate::query::{MatchAccess, Query, QueryNode, QueryOp};
    pub use crate::storage::{KeyLayout, TableBuilder, TermStats};
    pub use crate::termlist::{Term, TermEnumerator, open_all_terms};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
