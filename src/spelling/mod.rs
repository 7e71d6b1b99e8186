//! Spelling correction against the terms of a database.

pub mod suggest;

pub use self::suggest::{Suggestion, suggest};
