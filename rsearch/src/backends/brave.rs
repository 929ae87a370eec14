use rprovider::{HttpRequest, ProviderError};
use serde::Deserialize;
use serde_json::Value;

use super::{REQUESTED_RESULTS, SEARCH_TIMEOUT, SearchBackend, decode};
use crate::SearchHit;

const BRAVE_URL: &str = "https://api.search.brave.com/res/v1/web/search";

#[derive(Debug, Clone, Copy, Default)]
pub struct BraveBackend;

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

impl SearchBackend for BraveBackend {
    fn name(&self) -> &'static str {
        "brave"
    }

    fn secret(&self) -> Option<&'static str> {
        Some("brave")
    }

    fn build_request(&self, query: &str, api_key: Option<&str>) -> HttpRequest {
        HttpRequest::get(BRAVE_URL)
            .with_header("Accept", "application/json")
            .with_header("X-Subscription-Token", api_key.unwrap_or_default())
            .with_query("q", query)
            .with_query("count", REQUESTED_RESULTS.to_string())
            .with_timeout(SEARCH_TIMEOUT)
    }

    fn parse_hits(&self, body: Value) -> Result<Vec<SearchHit>, ProviderError> {
        let response: BraveResponse = decode(self.name(), body)?;
        Ok(response
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .map(|result| SearchHit::new(result.title, result.description, result.url))
            .collect())
    }
}
