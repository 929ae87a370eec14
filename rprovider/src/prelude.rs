//! Common `rprovider` imports for downstream crates.

pub use crate::{
    AdapterRegistry, AttemptOutcome, AttemptRecord, Candidate, ChainExhausted, ChainPlan,
    ChainReply, ChatAdapter, CredentialResolver, CredentialStore, DispatchHooks, Dispatcher,
    FallbackChains, HttpRequest, HttpTransport, Message, Mode, NoopDispatchHooks,
    ProviderCatalog, ProviderError, ProviderErrorKind, ProviderId, Reply, Role,
};
pub use rcommon::{BoxFuture, GenerationOptions};
