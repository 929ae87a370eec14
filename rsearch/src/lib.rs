//! Web search with ordered backend fallback.
//!
//! Credentialed backends are tried first, in priority order, and the
//! key-free DuckDuckGo instant-answer API comes last. The first backend that
//! yields at least one usable hit wins.

use std::sync::Arc;

use rprovider::{CredentialStore, HttpTransport};

pub mod backends;
mod hit;

pub use backends::{
    BraveBackend, DuckDuckGoBackend, JinaBackend, SearchBackend, SerperBackend, TavilyBackend,
    default_backends,
};
pub use hit::{MAX_RESULT_LINES, MAX_TEXT_CHARS, SearchHit, flatten_hits};

pub struct SearchAggregator {
    transport: Arc<dyn HttpTransport>,
    store: Arc<CredentialStore>,
    backends: Vec<Box<dyn SearchBackend>>,
}

impl SearchAggregator {
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<CredentialStore>) -> Self {
        Self::with_backends(transport, store, default_backends())
    }

    pub fn with_backends(
        transport: Arc<dyn HttpTransport>,
        store: Arc<CredentialStore>,
        backends: Vec<Box<dyn SearchBackend>>,
    ) -> Self {
        Self {
            transport,
            store,
            backends,
        }
    }

    /// Names of backends that would be attempted right now, in order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.backends
            .iter()
            .filter(|backend| self.api_key(backend.as_ref()).is_some())
            .map(|backend| backend.name())
            .collect()
    }

    /// Flattened results from the first backend that produces any, or `None`.
    pub async fn search(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        for backend in &self.backends {
            let Some(api_key) = self.api_key(backend.as_ref()) else {
                tracing::debug!(
                    phase = "search",
                    event = "backend_skipped",
                    backend = backend.name(),
                    reason = "credential_missing",
                );
                continue;
            };

            let request = backend.build_request(query, api_key.as_deref());
            let hits = match self.transport.send(request).await {
                Ok(body) => backend.parse_hits(body),
                Err(error) => Err(error),
            };

            match hits {
                Ok(hits) => match flatten_hits(&hits, MAX_RESULT_LINES) {
                    Some(text) => {
                        tracing::info!(
                            phase = "search",
                            event = "backend_answered",
                            backend = backend.name(),
                            lines = text.lines().count(),
                        );
                        return Some(text);
                    }
                    None => tracing::debug!(
                        phase = "search",
                        event = "backend_empty",
                        backend = backend.name(),
                    ),
                },
                Err(error) => tracing::warn!(
                    phase = "search",
                    event = "backend_failed",
                    backend = backend.name(),
                    error_kind = error.kind.as_str(),
                    status = ?error.status,
                    error = %error,
                ),
            }
        }

        tracing::info!(phase = "search", event = "exhausted");
        None
    }

    /// `Some(None)` for free backends, `Some(Some(key))` when the key is set,
    /// `None` when the backend cannot be used.
    fn api_key(&self, backend: &dyn SearchBackend) -> Option<Option<String>> {
        match backend.secret() {
            None => Some(None),
            Some(secret) => self.store.secret(secret).map(Some),
        }
    }
}

impl std::fmt::Debug for SearchAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAggregator")
            .field(
                "backends",
                &self.backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
