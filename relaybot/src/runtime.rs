//! Runtime assembly from an [`AppConfig`].

use std::sync::Arc;

use rchat::{ChatPolicy, ChatService, ConversationStore, InMemoryConversationStore};
use rmemory::{MemoryError, SqliteConversationStore};
use robserve::{
    FanoutDispatchHooks, MetricsDispatchHooks, SafeDispatchHooks, TracingDispatchHooks,
};
use rprovider::{
    AdapterRegistry, CredentialResolver, CredentialStore, Dispatcher, HttpTransport,
    ProviderCatalog,
};
use rsearch::SearchAggregator;

use crate::AppConfig;

/// Everything a host needs to serve chat turns.
#[derive(Clone)]
pub struct RelayRuntime {
    pub chat: ChatService,
    pub credentials: Arc<CredentialStore>,
    pub search: Arc<SearchAggregator>,
    pub store: Arc<dyn ConversationStore>,
}

impl std::fmt::Debug for RelayRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayRuntime")
            .field("credentials", &self.credentials)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

/// Builds a runtime over reqwest.
#[cfg(feature = "http-transport")]
pub fn build_runtime(config: &AppConfig) -> Result<RelayRuntime, MemoryError> {
    build_runtime_with(config, Arc::new(rprovider::ReqwestTransport::default()))
}

pub fn build_runtime_with(
    config: &AppConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<RelayRuntime, MemoryError> {
    let store: Arc<dyn ConversationStore> = match &config.db_path {
        Some(path) => Arc::new(SqliteConversationStore::new(path)?),
        None => Arc::new(InMemoryConversationStore::new()),
    };
    Ok(build_runtime_with_store(config, transport, store))
}

pub fn build_runtime_with_store(
    config: &AppConfig,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn ConversationStore>,
) -> RelayRuntime {
    let credentials = Arc::new(CredentialStore::new());
    for (name, value) in config.secrets() {
        if let Err(error) = credentials.set_secret(name, value) {
            tracing::warn!(event = "secret_rejected", secret = name, error = %error);
        }
    }

    let resolver = CredentialResolver::new(
        Arc::new(ProviderCatalog::builtin()),
        Arc::clone(&credentials),
    );
    let available = resolver.available_providers();
    tracing::info!(
        event = "runtime_ready",
        providers = available.len(),
        persistent = config.db_path.is_some()
    );

    let hooks = SafeDispatchHooks::new(
        FanoutDispatchHooks::new()
            .with(Arc::new(TracingDispatchHooks))
            .with(Arc::new(MetricsDispatchHooks)),
    );
    let dispatcher = Dispatcher::new(resolver, AdapterRegistry::with_transport(Arc::clone(&transport)))
        .with_hooks(Arc::new(hooks));

    let search = Arc::new(SearchAggregator::new(transport, Arc::clone(&credentials)));

    let chat = ChatService::builder(dispatcher, Arc::clone(&store))
        .search(Arc::clone(&search))
        .defaults(config.default_settings())
        .policy(ChatPolicy {
            command_prefix: config.command_prefix.clone(),
            history_limit: config.history_limit,
            auto_detect: config.auto_detect,
            ..ChatPolicy::default()
        })
        .build();

    RelayRuntime {
        chat,
        credentials,
        search,
        store,
    }
}
