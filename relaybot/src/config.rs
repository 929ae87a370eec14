//! Startup configuration read from the process environment.
//!
//! ```rust
//! use relaybot::{AppConfig, Mode, ProviderId};
//!
//! let config = AppConfig::from_lookup(|key| match key {
//!     "GROQ_API_KEY" => Some("gsk-test".to_string()),
//!     "DEFAULT_MODE" => Some("search".to_string()),
//!     _ => None,
//! })
//! .expect("config should parse");
//!
//! assert_eq!(config.default_provider, ProviderId::Groq);
//! assert_eq!(config.default_mode, Mode::Search);
//! assert!(config.has_secret("groq"));
//! ```

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use rchat::{DEFAULT_COMMAND_PREFIX, DEFAULT_HISTORY_LIMIT, UserSettings};
use rprovider::{Mode, ProviderCatalog, ProviderId, SecretString, parse_provider_id};

/// Environment variable to secret name, for providers and search backends.
pub const SECRET_VARIABLES: &[(&str, &str)] = &[
    ("GROQ_API_KEY", "groq"),
    ("OPENROUTER_API_KEY", "openrouter"),
    ("POLLINATIONS_API_KEY", "pollinations"),
    ("GEMINI_API_KEY", "gemini"),
    ("CEREBRAS_API_KEY", "cerebras"),
    ("CLOUDFLARE_API_TOKEN", "cloudflare"),
    ("CLOUDFLARE_ACCOUNT_ID", "cloudflare_account"),
    ("HUGGINGFACE_TOKEN", "huggingface"),
    ("COHERE_API_KEY", "cohere"),
    ("SILICONFLOW_API_KEY", "siliconflow"),
    ("ROUTEWAY_API_KEY", "routeway"),
    ("PUTER_API_KEY", "puter"),
    ("TAVILY_API_KEY", "tavily"),
    ("BRAVE_API_KEY", "brave"),
    ("SERPER_API_KEY", "serper"),
    ("JINA_API_KEY", "jina"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    InvalidValue,
    EnvFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub variable: Option<String>,
    pub message: String,
}

impl ConfigError {
    pub fn invalid(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConfigErrorKind::InvalidValue,
            variable: Some(variable.into()),
            message: message.into(),
        }
    }

    pub fn env_file(message: impl Into<String>) -> Self {
        Self {
            kind: ConfigErrorKind::EnvFile,
            variable: None,
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.variable {
            Some(variable) => write!(f, "{:?} ({variable}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub struct AppConfig {
    secrets: BTreeMap<&'static str, SecretString>,
    pub default_provider: ProviderId,
    pub default_model: String,
    pub default_mode: Mode,
    pub command_prefix: String,
    pub history_limit: usize,
    pub auto_detect: bool,
    /// SQLite file for settings and history; in-memory when unset.
    pub db_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = UserSettings::default();
        Self {
            secrets: BTreeMap::new(),
            default_provider: settings.provider,
            default_model: settings.model,
            default_mode: settings.mode,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            auto_detect: false,
            db_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads `path` into the process environment, then reads it like [`AppConfig::from_env`].
    /// Variables already set in the environment win over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        dotenvy::from_path(path)
            .map_err(|error| ConfigError::env_file(format!("{}: {error}", path.display())))?;
        Self::from_env()
    }

    /// Like [`AppConfig::from_env`], loading `.env` from the working directory when present.
    pub fn from_dotenv() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(event = "env_file_loaded", path = %path.display()),
            Err(error) if error.not_found() => {}
            Err(error) => return Err(ConfigError::env_file(error.to_string())),
        }
        Self::from_env()
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        for (variable, secret) in SECRET_VARIABLES {
            if let Some(value) = read(variable) {
                config.secrets.insert(secret, SecretString::new(value));
            }
        }

        if let Some(value) = read("DEFAULT_PROVIDER") {
            config.default_provider = parse_provider_id(&value)
                .map_err(|error| ConfigError::invalid("DEFAULT_PROVIDER", error.message))?;
            // a different provider starts on its own default model
            if let Some(descriptor) = ProviderCatalog::builtin().get(config.default_provider) {
                config.default_model = descriptor.default_model.to_string();
            }
        }
        if let Some(value) = read("DEFAULT_MODEL") {
            config.default_model = value;
        }
        if let Some(value) = read("DEFAULT_MODE") {
            config.default_mode = Mode::parse(&value)
                .map_err(|error| ConfigError::invalid("DEFAULT_MODE", error.message))?;
        }
        if let Some(value) = read("COMMAND_PREFIX") {
            config.command_prefix = value;
        }
        if let Some(value) = read("HISTORY_LIMIT") {
            config.history_limit = value.parse::<usize>().map_err(|_| {
                ConfigError::invalid("HISTORY_LIMIT", format!("'{value}' is not a whole number"))
            })?;
        }
        if let Some(value) = read("AUTO_DETECT_MODE") {
            config.auto_detect = parse_flag("AUTO_DETECT_MODE", &value)?;
        }
        config.db_path = read("RELAYBOT_DB_PATH").map(PathBuf::from);

        Ok(config)
    }

    pub fn with_secret(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.secrets.insert(name, SecretString::new(value));
        self
    }

    pub fn has_secret(&self, name: &str) -> bool {
        self.secrets.get(name).is_some_and(|secret| !secret.is_empty())
    }

    /// Configured secret names, sorted.
    pub fn secret_names(&self) -> Vec<&'static str> {
        self.secrets.keys().copied().collect()
    }

    pub(crate) fn secrets(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.secrets
            .iter()
            .filter(|(_, secret)| !secret.is_empty())
            .map(|(name, secret)| (*name, secret.expose()))
    }

    pub fn default_settings(&self) -> UserSettings {
        UserSettings::new(
            self.default_provider,
            self.default_model.clone(),
            self.default_mode,
        )
    }
}

fn parse_flag(variable: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(
            variable,
            format!("'{value}' is not a boolean"),
        )),
    }
}
