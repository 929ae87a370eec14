//! Persistence-layer errors.
//!
//! ```rust
//! use rmemory::{MemoryError, MemoryErrorKind};
//!
//! let error = MemoryError::corrupt_row("42", "mode", "creative");
//! assert_eq!(error.kind, MemoryErrorKind::CorruptRow);
//! assert_eq!(
//!     error.to_string(),
//!     "read settings: stored mode 'creative' for user '42' is not recognized"
//! );
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use rchat::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryErrorKind {
    /// The database could not be opened or its schema prepared.
    Unavailable,
    /// A statement against settings or history failed.
    Query,
    /// A stored settings row no longer names a known provider or mode.
    CorruptRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryError {
    pub kind: MemoryErrorKind,
    /// What the store was doing, e.g. `append message`.
    pub operation: &'static str,
    pub message: String,
}

impl MemoryError {
    pub fn unavailable(operation: &'static str, cause: impl Display) -> Self {
        Self {
            kind: MemoryErrorKind::Unavailable,
            operation,
            message: cause.to_string(),
        }
    }

    pub fn query(operation: &'static str, cause: impl Display) -> Self {
        Self {
            kind: MemoryErrorKind::Query,
            operation,
            message: cause.to_string(),
        }
    }

    pub fn corrupt_row(user: impl Display, column: &str, value: &str) -> Self {
        Self {
            kind: MemoryErrorKind::CorruptRow,
            operation: "read settings",
            message: format!("stored {column} '{value}' for user '{user}' is not recognized"),
        }
    }
}

impl Display for MemoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

impl Error for MemoryError {}

impl From<MemoryError> for ChatError {
    fn from(value: MemoryError) -> Self {
        ChatError::store(value.to_string())
    }
}
