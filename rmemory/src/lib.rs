//! SQLite persistence for per-user settings and conversation history.
//!
//! ```rust
//! use rmemory::SqliteConversationStore;
//!
//! let store = SqliteConversationStore::new_in_memory().expect("sqlite should open");
//! assert_eq!(store.message_count(&"someone".into()).expect("count"), 0);
//! ```

mod error;
mod sqlite;

pub mod prelude {
    pub use crate::{MemoryError, MemoryErrorKind, SqliteConversationStore};
}

pub use error::{MemoryError, MemoryErrorKind};
pub use sqlite::SqliteConversationStore;
