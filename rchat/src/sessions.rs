//! Cached per-user sessions with write-through persistence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rcommon::UserId;
use rprovider::{Candidate, Mode};

use crate::{ChatError, ChatFuture, ConversationStore, UserSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    Mode(Mode),
    Candidate(Candidate),
}

impl SettingsChange {
    fn apply(&self, settings: &mut UserSettings) {
        match self {
            Self::Mode(mode) => settings.mode = *mode,
            Self::Candidate(candidate) => {
                settings.provider = candidate.provider;
                settings.model = candidate.model.clone();
            }
        }
    }
}

/// Session cache in front of a [`ConversationStore`].
pub trait SessionStore: Send + Sync {
    /// Cached settings, loaded from persistence or defaults on first access.
    ///
    /// A failed read answers with the defaults for this call only.
    fn load<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<UserSettings, ChatError>>;

    /// Applies `change`, writes it through, then updates the cache.
    ///
    /// Fails without writing when the current settings cannot be read.
    fn update<'a>(
        &'a self,
        user: &'a UserId,
        change: SettingsChange,
    ) -> ChatFuture<'a, Result<UserSettings, ChatError>>;

    /// Settings for users with nothing persisted.
    fn defaults(&self) -> &UserSettings;
}

type SessionSlot = Arc<tokio::sync::Mutex<Option<UserSettings>>>;

pub struct InMemorySessionStore {
    persistence: Arc<dyn ConversationStore>,
    defaults: UserSettings,
    slots: Mutex<HashMap<UserId, SessionSlot>>,
}

impl InMemorySessionStore {
    pub fn new(persistence: Arc<dyn ConversationStore>, defaults: UserSettings) -> Self {
        Self {
            persistence,
            defaults,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, user: &UserId) -> Result<SessionSlot, ChatError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| ChatError::store("session map lock poisoned"))?;
        Ok(slots.entry(user.clone()).or_default().clone())
    }

    /// Only settings that were actually read get cached.
    async fn fill(
        &self,
        user: &UserId,
        cached: &mut Option<UserSettings>,
    ) -> Result<UserSettings, ChatError> {
        if let Some(settings) = cached.as_ref() {
            return Ok(settings.clone());
        }

        let settings = self
            .persistence
            .read_settings(user)
            .await?
            .unwrap_or_else(|| self.defaults.clone());
        *cached = Some(settings.clone());
        Ok(settings)
    }
}

impl SessionStore for InMemorySessionStore {
    fn load<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<UserSettings, ChatError>> {
        Box::pin(async move {
            let slot = self.slot(user)?;
            let mut cached = slot.lock().await;
            match self.fill(user, &mut cached).await {
                Ok(settings) => Ok(settings),
                Err(error) => {
                    tracing::warn!(
                        phase = "session",
                        event = "settings_read_failed",
                        user = %user,
                        error = %error,
                    );
                    Ok(self.defaults.clone())
                }
            }
        })
    }

    fn update<'a>(
        &'a self,
        user: &'a UserId,
        change: SettingsChange,
    ) -> ChatFuture<'a, Result<UserSettings, ChatError>> {
        Box::pin(async move {
            let slot = self.slot(user)?;
            let mut cached = slot.lock().await;
            let mut settings = self.fill(user, &mut cached).await?;
            change.apply(&mut settings);

            self.persistence.write_settings(user, &settings).await?;
            *cached = Some(settings.clone());
            Ok(settings)
        })
    }

    fn defaults(&self) -> &UserSettings {
        &self.defaults
    }
}

impl std::fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
