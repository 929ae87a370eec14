use rprovider::{HttpRequest, ProviderError};
use serde::Deserialize;
use serde_json::Value;

use super::{SEARCH_TIMEOUT, SearchBackend, decode};
use crate::SearchHit;

const DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";

/// Instant-answer API; needs no key and is always last in line.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoBackend;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    // groups first: an entry has only defaulted fields and would match anything
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Entry {
        #[serde(rename = "Text", default)]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
}

fn collect_topics(topics: Vec<RelatedTopic>, hits: &mut Vec<SearchHit>) {
    for topic in topics {
        match topic {
            RelatedTopic::Entry { text, first_url } => {
                hits.push(SearchHit::new("", text, first_url));
            }
            RelatedTopic::Group { topics } => collect_topics(topics, hits),
        }
    }
}

impl SearchBackend for DuckDuckGoBackend {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn build_request(&self, query: &str, _api_key: Option<&str>) -> HttpRequest {
        HttpRequest::get(DUCKDUCKGO_URL)
            .with_query("q", query)
            .with_query("format", "json")
            .with_query("no_html", "1")
            .with_query("skip_disambig", "1")
            .with_timeout(SEARCH_TIMEOUT)
    }

    fn parse_hits(&self, body: Value) -> Result<Vec<SearchHit>, ProviderError> {
        let answer: InstantAnswer = decode(self.name(), body)?;
        let mut hits = Vec::new();
        if !answer.abstract_text.trim().is_empty() {
            hits.push(SearchHit::new(
                answer.heading,
                answer.abstract_text,
                answer.abstract_url,
            ));
        }
        collect_topics(answer.related_topics, &mut hits);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn abstract_comes_before_related_topics() {
        let hits = DuckDuckGoBackend
            .parse_hits(json!({
                "Heading": "Rust",
                "AbstractText": "Rust is a language.",
                "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
                "RelatedTopics": [
                    {"Text": "Cargo - package manager", "FirstURL": "https://ddg/cargo"},
                    {"Name": "Tools", "Topics": [
                        {"Text": "rustup", "FirstURL": "https://ddg/rustup"}
                    ]}
                ]
            }))
            .expect("hits");

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Rust");
        assert_eq!(hits[1].url, "https://ddg/cargo");
        assert_eq!(hits[2].text, "rustup");
    }

    #[test]
    fn empty_answer_yields_no_hits() {
        let hits = DuckDuckGoBackend
            .parse_hits(json!({"Heading": "", "AbstractText": "", "RelatedTopics": []}))
            .expect("hits");
        assert!(hits.is_empty());
        assert!(DuckDuckGoBackend.secret().is_none());
    }
}
