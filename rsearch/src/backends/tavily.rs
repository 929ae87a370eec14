use rprovider::{HttpRequest, ProviderError};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{REQUESTED_RESULTS, SEARCH_TIMEOUT, SearchBackend, decode};
use crate::SearchHit;

const TAVILY_URL: &str = "https://api.tavily.com/search";

#[derive(Debug, Clone, Copy, Default)]
pub struct TavilyBackend;

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

impl SearchBackend for TavilyBackend {
    fn name(&self) -> &'static str {
        "tavily"
    }

    fn secret(&self) -> Option<&'static str> {
        Some("tavily")
    }

    fn build_request(&self, query: &str, api_key: Option<&str>) -> HttpRequest {
        HttpRequest::post(
            TAVILY_URL,
            json!({
                "api_key": api_key.unwrap_or_default(),
                "query": query,
                "max_results": REQUESTED_RESULTS,
                "search_depth": "basic",
            }),
        )
        .with_timeout(SEARCH_TIMEOUT)
    }

    fn parse_hits(&self, body: Value) -> Result<Vec<SearchHit>, ProviderError> {
        let response: TavilyResponse = decode(self.name(), body)?;
        Ok(response
            .results
            .into_iter()
            .map(|result| SearchHit::new(result.title, result.content, result.url))
            .collect())
    }
}
