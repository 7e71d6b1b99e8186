//! Shared utility modules used across Lexicore components.

pub mod levenshtein;
pub mod sortable;
pub mod varint;
