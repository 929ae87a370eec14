use rprovider::{HttpRequest, ProviderError};
use serde::Deserialize;
use serde_json::Value;

use super::{SEARCH_TIMEOUT, SearchBackend, decode};
use crate::SearchHit;

const JINA_URL: &str = "https://s.jina.ai/";

#[derive(Debug, Clone, Copy, Default)]
pub struct JinaBackend;

#[derive(Deserialize)]
struct JinaResponse {
    #[serde(default)]
    data: Vec<JinaResult>,
}

#[derive(Deserialize)]
struct JinaResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

impl SearchBackend for JinaBackend {
    fn name(&self) -> &'static str {
        "jina"
    }

    fn secret(&self) -> Option<&'static str> {
        Some("jina")
    }

    fn build_request(&self, query: &str, api_key: Option<&str>) -> HttpRequest {
        let request = HttpRequest::get(JINA_URL)
            .with_header("Accept", "application/json")
            .with_query("q", query)
            .with_timeout(SEARCH_TIMEOUT);
        match api_key {
            Some(key) => request.with_header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    fn parse_hits(&self, body: Value) -> Result<Vec<SearchHit>, ProviderError> {
        let response: JinaResponse = decode(self.name(), body)?;
        Ok(response
            .data
            .into_iter()
            .map(|result| {
                // page content can be a whole article; the description is the summary
                let text = if result.description.trim().is_empty() {
                    result.content
                } else {
                    result.description
                };
                SearchHit::new(result.title, text, result.url)
            })
            .collect())
    }
}
