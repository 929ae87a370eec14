//! Provider catalog, wire-format adapters, and ordered fallback dispatch.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use rprovider::{CredentialResolver, CredentialStore, FallbackChains, ProviderCatalog, ProviderId};
//!
//! let resolver = CredentialResolver::new(
//!     Arc::new(ProviderCatalog::builtin()),
//!     Arc::new(CredentialStore::new()),
//! );
//! let plan = FallbackChains::default().plan("normal", None, &resolver);
//!
//! assert_eq!(plan.chain[0].provider, ProviderId::Groq);
//! assert!(!resolver.is_available(ProviderId::Groq));
//! ```

pub mod adapters;
mod catalog;
mod chains;
mod credentials;
mod dispatch;
mod error;
mod hooks;
mod model;
pub mod prelude;
mod registry;
mod transport;

pub use adapters::{AdapterCall, ChatAdapter};
pub use catalog::{
    AuthScheme, CredentialRequirement, CredentialResolver, Endpoint, LatencyClass, ModelSpec,
    ProviderCatalog, ProviderDescriptor,
};
pub use chains::{ChainPlan, FallbackChains};
pub use credentials::{CredentialStore, SecretString};
pub use dispatch::{ChainExhausted, ChainReply, Dispatcher};
pub use error::{ProviderError, ProviderErrorKind};
pub use hooks::{AttemptOutcome, AttemptRecord, DispatchHooks, NoopDispatchHooks, SkipReason};
pub use model::{
    Candidate, Message, Mode, ProviderFuture, ProviderId, Reply, Role, WireFormat,
    parse_provider_id,
};
pub use registry::AdapterRegistry;
#[cfg(feature = "http-transport")]
pub use transport::ReqwestTransport;
pub use transport::{DEFAULT_REQUEST_TIMEOUT, HttpMethod, HttpRequest, HttpTransport};

pub use rcommon::{BoxFuture, GenerationOptions};
