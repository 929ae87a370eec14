//! Facade over the relaybot workspace crates.
//!
//! A host reads an [`AppConfig`], builds a [`RelayRuntime`], and feeds each
//! inbound message to [`ChatService::handle_command`] first and
//! [`ChatService::handle_turn`] when it is not a command.
//!
//! ```rust,no_run
//! use relaybot::prelude::*;
//!
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_dotenv()?;
//! let runtime = build_runtime(&config)?;
//!
//! let user = UserId::from("discord:1234");
//! let text = "!mode search";
//! let reply = match runtime.chat.handle_command(&user, text).await {
//!     Some(reply) => reply,
//!     None => runtime.chat.handle_turn(&user, text).await,
//! };
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod config;
mod macros;

pub mod prelude;
pub mod runtime;

pub use rchat;
pub use rcommon;
pub use rmemory;
pub use robserve;
pub use rprovider;
pub use rsearch;

pub use config::{AppConfig, ConfigError, ConfigErrorKind, SECRET_VARIABLES};
#[cfg(feature = "http-transport")]
pub use runtime::build_runtime;
pub use runtime::{RelayRuntime, build_runtime_with, build_runtime_with_store};

pub use rchat::{
    APOLOGY, ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, Command,
    ConversationStore, InMemoryConversationStore, InMemorySessionStore, ModeDetector,
    SessionStore, SystemPrompts, TurnOutcome, TurnRequest, UserSettings, parse_command,
};
pub use rcommon::{GenerationOptions, UserId};
pub use rmemory::{MemoryError, MemoryErrorKind, SqliteConversationStore};
pub use robserve::{
    FanoutDispatchHooks, MetricsDispatchHooks, SafeDispatchHooks, TracingDispatchHooks,
};
pub use rprovider::{
    AdapterRegistry, AttemptOutcome, AttemptRecord, Candidate, ChainExhausted, ChainPlan,
    CredentialResolver, CredentialStore, DispatchHooks, Dispatcher, FallbackChains, HttpRequest,
    HttpTransport, Message, Mode, ProviderCatalog, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, Role, SecretString, parse_provider_id,
};
pub use rsearch::{SearchAggregator, SearchBackend, SearchHit};
