use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rchat::{ChatError, ChatFuture, ConversationStore, UserSettings};
use rcommon::UserId;
use rprovider::{Message, Mode, Role, parse_provider_id};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::MemoryError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct SqliteConversationStore {
    pub(crate) connection: Mutex<Connection>,
}

impl SqliteConversationStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|error| MemoryError::unavailable("create database directory", error))?;
        }

        let connection =
            Connection::open(path).map_err(|error| MemoryError::unavailable("open database", error))?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, MemoryError> {
        let connection = Connection::open_in_memory()
            .map_err(|error| MemoryError::unavailable("open in-memory database", error))?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, MemoryError> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(|error| MemoryError::unavailable("configure busy timeout", error))?;
        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, MemoryError> {
        self.connection
            .lock()
            .map_err(|_| MemoryError::unavailable("lock connection", "poisoned"))
    }

    fn initialize_schema(&self) -> Result<(), MemoryError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS user_settings (
                user_id TEXT PRIMARY KEY,
                provider TEXT NOT NULL,
                model TEXT NOT NULL,
                mode TEXT NOT NULL,
                updated_at_secs INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at_secs INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_user_id
            ON messages(user_id, id);
            ",
        )
        .map_err(|error| MemoryError::unavailable("initialize schema", error))?;

        Ok(())
    }

    pub fn load_settings(&self, user: &UserId) -> Result<Option<UserSettings>, MemoryError> {
        let conn = self.connection()?;
        let row = conn
            .query_row(
                "SELECT provider, model, mode FROM user_settings WHERE user_id = ?1",
                params![user.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|error| MemoryError::query("read settings", error))?;

        let Some((provider, model, mode)) = row else {
            return Ok(None);
        };
        let provider = parse_provider_id(&provider)
            .map_err(|_| MemoryError::corrupt_row(user, "provider", &provider))?;
        let mode = Mode::parse(&mode).map_err(|_| MemoryError::corrupt_row(user, "mode", &mode))?;
        Ok(Some(UserSettings::new(provider, model, mode)))
    }

    pub fn save_settings(&self, user: &UserId, settings: &UserSettings) -> Result<(), MemoryError> {
        let conn = self.connection()?;
        conn.execute(
            "
            INSERT INTO user_settings (user_id, provider, model, mode, updated_at_secs)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                provider = excluded.provider,
                model = excluded.model,
                mode = excluded.mode,
                updated_at_secs = excluded.updated_at_secs
            ",
            params![
                user.as_str(),
                settings.provider.as_str(),
                &settings.model,
                settings.mode.as_str(),
                now_secs(),
            ],
        )
        .map_err(|error| MemoryError::query("save settings", error))?;
        Ok(())
    }

    pub fn insert_message(&self, user: &UserId, message: &Message) -> Result<(), MemoryError> {
        let conn = self.connection()?;
        conn.execute(
            "
            INSERT INTO messages (user_id, role, content, created_at_secs)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                user.as_str(),
                message.role.as_str(),
                &message.content,
                now_secs(),
            ],
        )
        .map_err(|error| MemoryError::query("append message", error))?;
        Ok(())
    }

    pub fn recent_messages(&self, user: &UserId, limit: usize) -> Result<Vec<Message>, MemoryError> {
        let limit = sql_limit(limit);
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "
                SELECT role, content FROM (
                    SELECT id, role, content
                    FROM messages
                    WHERE user_id = ?1
                    ORDER BY id DESC
                    LIMIT ?2
                )
                ORDER BY id ASC
                ",
            )
            .map_err(|error| MemoryError::query("read history", error))?;
        let rows = stmt
            .query_map(params![user.as_str(), limit], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|error| MemoryError::query("read history", error))?;

        let mut messages = Vec::new();
        for row in rows {
            let (role, content) = row.map_err(|error| MemoryError::query("read history", error))?;
            let Some(role) = Role::parse(&role) else {
                tracing::warn!(
                    phase = "memory",
                    event = "unknown_role_skipped",
                    user = %user,
                    role = role.as_str(),
                );
                continue;
            };
            messages.push(Message::new(role, content));
        }
        Ok(messages)
    }

    pub fn delete_messages(&self, user: &UserId) -> Result<usize, MemoryError> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM messages WHERE user_id = ?1", params![user.as_str()])
            .map_err(|error| MemoryError::query("clear history", error))
    }

    /// Deletes all but the newest `keep` messages for `user`.
    pub fn prune_messages(&self, user: &UserId, keep: usize) -> Result<usize, MemoryError> {
        let conn = self.connection()?;
        conn.execute(
            "
            DELETE FROM messages
            WHERE user_id = ?1
              AND id NOT IN (
                  SELECT id FROM messages
                  WHERE user_id = ?1
                  ORDER BY id DESC
                  LIMIT ?2
              )
            ",
            params![user.as_str(), sql_limit(keep)],
        )
        .map_err(|error| MemoryError::query("trim history", error))
    }

    pub fn message_count(&self, user: &UserId) -> Result<usize, MemoryError> {
        let conn = self.connection()?;
        let count = conn
            .query_row(
                "SELECT COUNT(*) FROM messages WHERE user_id = ?1",
                params![user.as_str()],
                |row| row.get::<_, i64>(0),
            )
            .map_err(|error| MemoryError::query("count messages", error))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

impl ConversationStore for SqliteConversationStore {
    fn read_settings<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<Option<UserSettings>, ChatError>> {
        Box::pin(async move { self.load_settings(user).map_err(ChatError::from) })
    }

    fn write_settings<'a>(
        &'a self,
        user: &'a UserId,
        settings: &'a UserSettings,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move { self.save_settings(user, settings).map_err(ChatError::from) })
    }

    fn append_message<'a>(
        &'a self,
        user: &'a UserId,
        message: Message,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move { self.insert_message(user, &message).map_err(ChatError::from) })
    }

    fn read_history<'a>(
        &'a self,
        user: &'a UserId,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<Message>, ChatError>> {
        Box::pin(async move { self.recent_messages(user, limit).map_err(ChatError::from) })
    }

    fn clear_history<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move { self.delete_messages(user).map_err(ChatError::from) })
    }

    fn count_messages<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move { self.message_count(user).map_err(ChatError::from) })
    }

    fn trim_history<'a>(
        &'a self,
        user: &'a UserId,
        keep: usize,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move { self.prune_messages(user, keep).map_err(ChatError::from) })
    }
}
