//! Storage layer consumed by the term enumerators.
//!
//! The physical page format of a production B-tree lives outside this crate.
//! What is here is the cursor contract the enumerators rely on, the key layout
//! of postlist tables, and an in-memory table (with a simple file format) that
//! implements the contract.

pub mod builder;
pub mod file;
pub mod layout;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use builder::TableBuilder;
pub use file::{read_table, write_table};
pub use layout::{KeyLayout, SENTINEL, TermStats, decode_term_stats};
pub use memory::{MemoryCursor, MemoryTable};
pub use traits::Cursor;
