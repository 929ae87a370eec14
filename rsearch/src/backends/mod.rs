//! Search backends: request shaping and response parsing, no I/O.

use std::time::Duration;

use rprovider::{HttpRequest, ProviderError};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::SearchHit;

mod brave;
mod duckduckgo;
mod jina;
mod serper;
mod tavily;

pub use brave::BraveBackend;
pub use duckduckgo::DuckDuckGoBackend;
pub use jina::JinaBackend;
pub use serper::SerperBackend;
pub use tavily::TavilyBackend;

pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const REQUESTED_RESULTS: usize = 5;

/// A web search API that the aggregator can query.
///
/// Backends only describe the HTTP exchange; the aggregator owns the
/// transport and the credential lookup.
pub trait SearchBackend: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Secret name this backend needs, `None` for free backends.
    fn secret(&self) -> Option<&'static str> {
        None
    }

    fn build_request(&self, query: &str, api_key: Option<&str>) -> HttpRequest;

    fn parse_hits(&self, body: Value) -> Result<Vec<SearchHit>, ProviderError>;
}

/// Built-in backends in priority order.
pub fn default_backends() -> Vec<Box<dyn SearchBackend>> {
    vec![
        Box::new(TavilyBackend),
        Box::new(BraveBackend),
        Box::new(SerperBackend),
        Box::new(JinaBackend),
        Box::new(DuckDuckGoBackend),
    ]
}

pub(crate) fn decode<T: DeserializeOwned>(backend: &str, body: Value) -> Result<T, ProviderError> {
    serde_json::from_value(body).map_err(|error| {
        ProviderError::malformed_response(format!("{backend} search response: {error}"))
    })
}
