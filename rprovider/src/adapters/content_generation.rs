//! `generateContent`-style requests with a separate system instruction.
//!
//! ```rust
//! use rprovider::adapters::{AdapterCall, content_generation};
//! use rprovider::{Candidate, Message, ProviderId};
//!
//! let call = AdapterCall::new(
//!     Candidate::new(ProviderId::Gemini, "gemini-2.5-flash"),
//!     "https://example.test",
//!     vec![Message::system("be kind"), Message::user("a"), Message::user("b")],
//! );
//! let payload = content_generation::build_payload(&call).expect("payload");
//!
//! assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "be kind");
//! assert_eq!(payload["contents"].as_array().map(Vec::len), Some(1));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterCall, ChatAdapter, decode, post_for_reply, to_payload};
use crate::{HttpTransport, Message, ProviderError, ProviderFuture, Reply, Role, WireFormat};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentPayload<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn content_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    }
}

/// Consecutive turns with the same mapped role share one entry.
fn collapse_turns(messages: &[Message]) -> Vec<Content<'_>> {
    let mut contents: Vec<Content<'_>> = Vec::new();
    for message in messages.iter().filter(|message| message.role != Role::System) {
        let role = content_role(message.role);
        let part = Part {
            text: message.content.as_str(),
        };
        match contents.last_mut() {
            Some(last) if last.role == role => last.parts.push(part),
            _ => contents.push(Content {
                role,
                parts: vec![part],
            }),
        }
    }
    contents
}

pub fn build_payload(call: &AdapterCall) -> Result<Value, ProviderError> {
    let system_parts = call
        .messages
        .iter()
        .filter(|message| message.role == Role::System)
        .map(|message| Part {
            text: message.content.as_str(),
        })
        .collect::<Vec<_>>();

    to_payload(&GenerateContentPayload {
        contents: collapse_turns(&call.messages),
        system_instruction: (!system_parts.is_empty()).then_some(SystemInstruction {
            parts: system_parts,
        }),
        generation_config: GenerationConfig {
            temperature: call.options.temperature,
            max_output_tokens: call.options.max_tokens,
        },
    })
}

pub fn extract_reply(body: Value) -> Result<Reply, ProviderError> {
    let response: GenerateContentResponse = decode(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        });

    Ok(Reply::from_optional(text))
}

#[derive(Clone)]
pub struct ContentGenerationAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl ContentGenerationAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl ChatAdapter for ContentGenerationAdapter {
    fn wire_format(&self) -> WireFormat {
        WireFormat::ContentGeneration
    }

    fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply> {
        Box::pin(async move {
            let payload = build_payload(&call);
            post_for_reply(&self.transport, &call, payload, extract_reply).await
        })
    }
}
