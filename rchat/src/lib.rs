//! Conversational orchestration over fallback provider chains.
//!
//! A turn assembles the mode's system prompt, optional web results, the
//! recent history window, and the new message; dispatches it through the
//! user's pinned candidate and the mode's fallback chain; and persists the
//! exchange only when someone answered.

mod commands;
mod detector;
mod error;
mod prompts;
mod service;
mod sessions;
mod store;

pub mod prelude {
    pub use crate::{
        APOLOGY, ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder,
        ConversationStore, InMemoryConversationStore, InMemorySessionStore, SessionStore,
        TurnOutcome, TurnRequest, UserSettings,
    };
    pub use rcommon::UserId;
}

pub use commands::{Command, parse_command};
pub use detector::ModeDetector;
pub use error::{ChatError, ChatErrorKind};
pub use prompts::{SystemPrompts, search_context_message, strip_think_tags};
pub use service::{
    APOLOGY, ChatPolicy, ChatService, ChatServiceBuilder, DEFAULT_COMMAND_PREFIX,
    DEFAULT_HISTORY_LIMIT, EMPTY_INPUT_TEXT, NO_ANSWER_TEXT, TurnOutcome, TurnRequest,
};
pub use sessions::{InMemorySessionStore, SessionStore, SettingsChange};
pub use store::{ChatFuture, ConversationStore, InMemoryConversationStore, UserSettings};
pub use rcommon::UserId;
