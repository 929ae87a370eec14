//! Flat role/content message arrays with block or run-result replies.
//!
//! Cohere's v2 chat answers in `message.content[..].text` blocks; Workers AI
//! runs answer in `result.response`. Both accept the same request shape.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterCall, ChatAdapter, WireMessage, decode, post_for_reply, to_payload, wire_messages};
use crate::{HttpTransport, ProviderError, ProviderFuture, Reply, WireFormat};

#[derive(Debug, Serialize)]
struct MessageArrayPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessageArrayResponse {
    message: Option<BlockMessage>,
    result: Option<RunResult>,
}

#[derive(Debug, Deserialize)]
struct BlockMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    response: Option<String>,
}

pub fn build_payload(call: &AdapterCall) -> Result<Value, ProviderError> {
    to_payload(&MessageArrayPayload {
        model: (!call.model_in_endpoint).then(|| call.model()),
        messages: wire_messages(&call.messages),
        temperature: call.options.temperature,
        max_tokens: call.options.max_tokens,
    })
}

pub fn extract_reply(body: Value) -> Result<Reply, ProviderError> {
    let response: MessageArrayResponse = decode(body)?;

    let from_blocks = response
        .message
        .and_then(|message| message.content.into_iter().find_map(|block| block.text));
    let text = from_blocks.or_else(|| response.result.and_then(|result| result.response));

    Ok(Reply::from_optional(text))
}

#[derive(Clone)]
pub struct MessageArrayAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl MessageArrayAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl ChatAdapter for MessageArrayAdapter {
    fn wire_format(&self) -> WireFormat {
        WireFormat::MessageArray
    }

    fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply> {
        Box::pin(async move {
            let payload = build_payload(&call);
            post_for_reply(&self.transport, &call, payload, extract_reply).await
        })
    }
}
