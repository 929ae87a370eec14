use rprovider::{HttpRequest, ProviderError};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{REQUESTED_RESULTS, SEARCH_TIMEOUT, SearchBackend, decode};
use crate::SearchHit;

const SERPER_URL: &str = "https://google.serper.dev/search";

#[derive(Debug, Clone, Copy, Default)]
pub struct SerperBackend;

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Deserialize)]
struct SerperResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

impl SearchBackend for SerperBackend {
    fn name(&self) -> &'static str {
        "serper"
    }

    fn secret(&self) -> Option<&'static str> {
        Some("serper")
    }

    fn build_request(&self, query: &str, api_key: Option<&str>) -> HttpRequest {
        HttpRequest::post(SERPER_URL, json!({"q": query, "num": REQUESTED_RESULTS}))
            .with_header("X-API-KEY", api_key.unwrap_or_default())
            .with_timeout(SEARCH_TIMEOUT)
    }

    fn parse_hits(&self, body: Value) -> Result<Vec<SearchHit>, ProviderError> {
        let response: SerperResponse = decode(self.name(), body)?;
        Ok(response
            .organic
            .into_iter()
            .map(|result| SearchHit::new(result.title, result.snippet, result.link))
            .collect())
    }
}
