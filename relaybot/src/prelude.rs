//! Common imports for most relaybot hosts.

pub use crate::{AppConfig, ConfigError, RelayRuntime, build_runtime_with};
#[cfg(feature = "http-transport")]
pub use crate::build_runtime;
pub use crate::{relay_candidate, relay_messages, relay_msg};
pub use crate::{
    APOLOGY, Candidate, ChatError, ChatPolicy, ChatService, ConversationStore, CredentialStore,
    Dispatcher, FallbackChains, HttpTransport, Message, Mode, ProviderError, ProviderId, Role,
    SearchAggregator, TurnOutcome, TurnRequest, UserId, UserSettings,
};
