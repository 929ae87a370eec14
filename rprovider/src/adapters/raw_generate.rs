//! Single-prompt generate endpoints (`response` field).
//!
//! Only the last system message and the last user message survive; they are
//! joined by a blank line into one prompt.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterCall, ChatAdapter, decode, last_with_role, post_for_reply, to_payload};
use crate::{HttpTransport, Message, ProviderError, ProviderFuture, Reply, Role, WireFormat};

#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

pub fn build_prompt(messages: &[Message]) -> String {
    [
        last_with_role(messages, Role::System),
        last_with_role(messages, Role::User),
    ]
    .into_iter()
    .flatten()
    .map(|message| message.content.as_str())
    .collect::<Vec<_>>()
    .join("\n\n")
}

pub fn build_payload(call: &AdapterCall) -> Result<Value, ProviderError> {
    to_payload(&GeneratePayload {
        model: call.model(),
        prompt: build_prompt(&call.messages),
        stream: false,
        options: GenerateOptions {
            temperature: call.options.temperature,
            num_predict: call.options.max_tokens,
        },
    })
}

pub fn extract_reply(body: Value) -> Result<Reply, ProviderError> {
    let response: GenerateResponse = decode(body)?;
    Ok(Reply::from_optional(response.response))
}

#[derive(Clone)]
pub struct RawGenerateAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl RawGenerateAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl ChatAdapter for RawGenerateAdapter {
    fn wire_format(&self) -> WireFormat {
        WireFormat::RawGenerate
    }

    fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply> {
        Box::pin(async move {
            let payload = build_payload(&call);
            post_for_reply(&self.transport, &call, payload, extract_reply).await
        })
    }
}
