//! Conversation storage contracts and a basic in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use rcommon::{BoxFuture, UserId};
use rprovider::{Candidate, Message, Mode, ProviderId};

use crate::ChatError;

pub type ChatFuture<'a, T> = BoxFuture<'a, T>;

/// Per-user provider, model, and mode selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub provider: ProviderId,
    pub model: String,
    pub mode: Mode,
}

impl UserSettings {
    pub fn new(provider: ProviderId, model: impl Into<String>, mode: Mode) -> Self {
        Self {
            provider,
            model: model.into(),
            mode,
        }
    }

    pub fn candidate(&self) -> Candidate {
        Candidate::new(self.provider, self.model.clone())
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::new(ProviderId::Groq, "llama-3.3-70b-versatile", Mode::Normal)
    }
}

/// Durable per-user settings and message history.
///
/// Every method is a single atomic write or read; callers never compose them
/// into transactions.
pub trait ConversationStore: Send + Sync {
    fn read_settings<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<Option<UserSettings>, ChatError>>;

    fn write_settings<'a>(
        &'a self,
        user: &'a UserId,
        settings: &'a UserSettings,
    ) -> ChatFuture<'a, Result<(), ChatError>>;

    fn append_message<'a>(
        &'a self,
        user: &'a UserId,
        message: Message,
    ) -> ChatFuture<'a, Result<(), ChatError>>;

    /// The most recent `limit` messages, oldest first.
    fn read_history<'a>(
        &'a self,
        user: &'a UserId,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<Message>, ChatError>>;

    /// Returns how many messages were removed.
    fn clear_history<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<usize, ChatError>>;

    fn count_messages<'a>(&'a self, user: &'a UserId)
    -> ChatFuture<'a, Result<usize, ChatError>>;

    /// Drops all but the newest `keep` messages; returns how many were removed.
    fn trim_history<'a>(
        &'a self,
        user: &'a UserId,
        keep: usize,
    ) -> ChatFuture<'a, Result<usize, ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    settings: Mutex<HashMap<UserId, UserSettings>>,
    history: Mutex<HashMap<UserId, Vec<Message>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ChatError {
    ChatError::store("conversation store lock poisoned")
}

impl ConversationStore for InMemoryConversationStore {
    fn read_settings<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<Option<UserSettings>, ChatError>> {
        Box::pin(async move {
            let settings = self.settings.lock().map_err(poisoned)?;
            Ok(settings.get(user).cloned())
        })
    }

    fn write_settings<'a>(
        &'a self,
        user: &'a UserId,
        settings: &'a UserSettings,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.settings
                .lock()
                .map_err(poisoned)?
                .insert(user.clone(), settings.clone());
            Ok(())
        })
    }

    fn append_message<'a>(
        &'a self,
        user: &'a UserId,
        message: Message,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.history
                .lock()
                .map_err(poisoned)?
                .entry(user.clone())
                .or_default()
                .push(message);
            Ok(())
        })
    }

    fn read_history<'a>(
        &'a self,
        user: &'a UserId,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<Message>, ChatError>> {
        Box::pin(async move {
            let history = self.history.lock().map_err(poisoned)?;
            let messages = history.get(user).map(Vec::as_slice).unwrap_or_default();
            let start = messages.len().saturating_sub(limit);
            Ok(messages[start..].to_vec())
        })
    }

    fn clear_history<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move {
            let removed = self.history.lock().map_err(poisoned)?.remove(user);
            Ok(removed.map_or(0, |messages| messages.len()))
        })
    }

    fn count_messages<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move {
            let history = self.history.lock().map_err(poisoned)?;
            Ok(history.get(user).map_or(0, Vec::len))
        })
    }

    fn trim_history<'a>(
        &'a self,
        user: &'a UserId,
        keep: usize,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move {
            let mut history = self.history.lock().map_err(poisoned)?;
            let Some(messages) = history.get_mut(user) else {
                return Ok(0);
            };
            let excess = messages.len().saturating_sub(keep);
            messages.drain(..excess);
            Ok(excess)
        })
    }
}
