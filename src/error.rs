//! Error types for the Lexicore library.
//!
//! All fallible operations return [`LexicoreError`]. The variants follow the
//! three failure classes of this crate: on-disk damage ([`LexicoreError::Corruption`]),
//! caller misuse ([`LexicoreError::InvalidState`] and
//! [`LexicoreError::InvalidArgument`]) and plumbing failures (I/O, JSON).
//!
//! # Examples
//!
//! ```
//! use lexicore::error::{LexicoreError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexicoreError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lexicore operations.
#[derive(Error, Debug)]
pub enum LexicoreError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored data is structurally damaged. Fatal for the database.
    #[error("Database corrupt: {0}")]
    Corruption(String),

    /// The operation is not valid in the object's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An argument was outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LexicoreError.
pub type Result<T> = std::result::Result<T, LexicoreError>;

impl LexicoreError {
    /// Create a new corruption error.
    pub fn corruption<S: Into<String>>(msg: S) -> Self {
        LexicoreError::Corruption(msg.into())
    }

    /// Create a new invalid state error.
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        LexicoreError::InvalidState(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LexicoreError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LexicoreError::Other(msg.into())
    }

    /// Whether this error signals on-disk damage.
    pub fn is_corruption(&self) -> bool {
        matches!(self, LexicoreError::Corruption(_))
    }

    /// Whether this error signals use of an object in the wrong state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, LexicoreError::InvalidState(_))
    }

    /// Whether this error signals a rejected argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LexicoreError::InvalidArgument(_))
    }
}
