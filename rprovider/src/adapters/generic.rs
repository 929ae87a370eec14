//! OpenAI-compatible chat completions (`choices[0].message.content`).
//!
//! ```rust
//! use rprovider::adapters::{AdapterCall, generic};
//! use rprovider::{Candidate, Message, ProviderId, Reply};
//!
//! let call = AdapterCall::new(
//!     Candidate::new(ProviderId::Groq, "llama-3.1-8b-instant"),
//!     "https://api.groq.com/openai/v1/chat/completions",
//!     vec![Message::user("hi")],
//! );
//! let payload = generic::build_payload(&call).expect("payload");
//! assert_eq!(payload["model"], "llama-3.1-8b-instant");
//! assert_eq!(payload["max_tokens"], 4096);
//!
//! let reply = generic::extract_reply(serde_json::json!({
//!     "choices": [{"message": {"content": "hello"}}]
//! }));
//! assert_eq!(reply.ok(), Some(Reply::Text("hello".to_string())));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterCall, ChatAdapter, WireMessage, decode, post_for_reply, to_payload, wire_messages};
use crate::{HttpTransport, ProviderError, ProviderFuture, Reply, WireFormat};

#[derive(Debug, Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

pub fn build_payload(call: &AdapterCall) -> Result<Value, ProviderError> {
    to_payload(&CompletionPayload {
        model: call.model(),
        messages: wire_messages(&call.messages),
        temperature: call.options.temperature,
        max_tokens: call.options.max_tokens,
    })
}

pub fn extract_reply(body: Value) -> Result<Reply, ProviderError> {
    let response: CompletionResponse = decode(body)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    Ok(Reply::from_optional(content))
}

#[derive(Clone)]
pub struct GenericCompletionAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl GenericCompletionAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl ChatAdapter for GenericCompletionAdapter {
    fn wire_format(&self) -> WireFormat {
        WireFormat::GenericCompletion
    }

    fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply> {
        Box::pin(async move {
            let payload = build_payload(&call);
            post_for_reply(&self.transport, &call, payload, extract_reply).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::adapters::test_support::CannedTransport;
    use crate::{Candidate, HttpMethod, Message, ProviderId};

    fn sample_call() -> AdapterCall {
        AdapterCall::new(
            Candidate::new(ProviderId::Groq, "llama-3.3-70b-versatile"),
            "https://api.groq.com/openai/v1/chat/completions",
            vec![
                Message::system("be brief"),
                Message::user("hello"),
                Message::assistant("hi"),
                Message::user("how are you?"),
            ],
        )
        .with_headers(vec![("Authorization".to_string(), "Bearer gsk".to_string())])
        .with_timeout(Duration::from_secs(30))
    }

    #[test]
    fn payload_preserves_order_and_roles() {
        let payload = build_payload(&sample_call()).expect("payload");

        assert_eq!(
            payload,
            json!({
                "model": "llama-3.3-70b-versatile",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi"},
                    {"role": "user", "content": "how are you?"}
                ],
                "temperature": 0.7,
                "max_tokens": 4096
            })
        );
    }

    #[test]
    fn payload_bytes_are_stable_for_identical_input() {
        let first = serde_json::to_string(&build_payload(&sample_call()).expect("payload"))
            .expect("serialize");
        let second = serde_json::to_string(&build_payload(&sample_call()).expect("payload"))
            .expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_null_or_blank_content_is_no_answer() {
        for body in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{"message": {"content": null}}]}),
            json!({"choices": [{"message": {"content": "  "}}]}),
        ] {
            assert_eq!(extract_reply(body).expect("decodes"), Reply::NoAnswer);
        }
    }

    #[tokio::test]
    async fn adapter_posts_payload_with_headers_and_timeout() {
        let transport = Arc::new(CannedTransport::ok(json!({
            "choices": [{"message": {"content": "hi there"}}]
        })));
        let adapter = GenericCompletionAdapter::new(transport.clone());

        let reply = adapter.complete(sample_call()).await;
        assert_eq!(reply, Reply::Text("hi there".to_string()));

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(request.header("Authorization"), Some("Bearer gsk"));
        assert_eq!(request.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn transport_failures_become_no_answer() {
        let transport = Arc::new(CannedTransport::err(
            ProviderError::transport("upstream down").with_status(503),
        ));
        let adapter = GenericCompletionAdapter::new(transport);

        assert_eq!(adapter.complete(sample_call()).await, Reply::NoAnswer);
    }
}
