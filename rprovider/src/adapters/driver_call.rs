//! Generic driver-call envelopes.
//!
//! The driver is chosen from the model id alone: a static prefix table first,
//! then vendor-qualified ids (`vendor/model`) route through the aggregator
//! driver, and anything else falls back to the completion driver.
//!
//! ```rust
//! use rprovider::adapters::{PuterDriver, driver_for_model};
//!
//! assert_eq!(driver_for_model("gpt-4o-mini"), PuterDriver::OpenAiCompletion);
//! assert_eq!(driver_for_model("claude-sonnet-4"), PuterDriver::Claude);
//! assert_eq!(driver_for_model("x-ai/grok-3"), PuterDriver::OpenRouter);
//! assert_eq!(driver_for_model("mystery"), PuterDriver::OpenAiCompletion);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterCall, ChatAdapter, WireMessage, decode, post_for_reply, to_payload, wire_messages};
use crate::{HttpTransport, ProviderError, ProviderFuture, Reply, WireFormat};

pub const DRIVER_INTERFACE: &str = "puter-chat-completion";
pub const DRIVER_METHOD: &str = "complete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuterDriver {
    OpenAiCompletion,
    Claude,
    OpenRouter,
}

impl PuterDriver {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAiCompletion => "openai-completion",
            Self::Claude => "claude",
            Self::OpenRouter => "openrouter",
        }
    }
}

pub const DRIVER_PREFIXES: &[(&str, PuterDriver)] = &[
    ("gpt-", PuterDriver::OpenAiCompletion),
    ("o1", PuterDriver::OpenAiCompletion),
    ("o3", PuterDriver::OpenAiCompletion),
    ("claude-", PuterDriver::Claude),
];

pub fn driver_for_model(model: &str) -> PuterDriver {
    if let Some((_, driver)) = DRIVER_PREFIXES
        .iter()
        .find(|(prefix, _)| model.starts_with(prefix))
    {
        return *driver;
    }

    if model.contains('/') {
        PuterDriver::OpenRouter
    } else {
        PuterDriver::OpenAiCompletion
    }
}

#[derive(Debug, Serialize)]
struct DriverEnvelope<'a> {
    interface: &'static str,
    driver: &'static str,
    method: &'static str,
    args: DriverArgs<'a>,
}

#[derive(Debug, Serialize)]
struct DriverArgs<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct DriverResponse {
    result: Option<DriverResult>,
}

#[derive(Debug, Deserialize)]
struct DriverResult {
    message: Option<DriverMessage>,
}

#[derive(Debug, Deserialize)]
struct DriverMessage {
    content: Option<DriverContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DriverContent {
    Text(String),
    Blocks(Vec<DriverBlock>),
}

#[derive(Debug, Deserialize)]
struct DriverBlock {
    text: Option<String>,
}

impl DriverContent {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Blocks(blocks) => blocks
                .into_iter()
                .filter_map(|block| block.text)
                .collect::<String>(),
        }
    }
}

pub fn build_payload(call: &AdapterCall) -> Result<Value, ProviderError> {
    to_payload(&DriverEnvelope {
        interface: DRIVER_INTERFACE,
        driver: driver_for_model(call.model()).as_str(),
        method: DRIVER_METHOD,
        args: DriverArgs {
            model: call.model(),
            messages: wire_messages(&call.messages),
            temperature: call.options.temperature,
            max_tokens: call.options.max_tokens,
        },
    })
}

pub fn extract_reply(body: Value) -> Result<Reply, ProviderError> {
    let response: DriverResponse = decode(body)?;
    let text = response
        .result
        .and_then(|result| result.message)
        .and_then(|message| message.content)
        .map(DriverContent::into_text);

    Ok(Reply::from_optional(text))
}

#[derive(Clone)]
pub struct DriverCallAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl DriverCallAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl ChatAdapter for DriverCallAdapter {
    fn wire_format(&self) -> WireFormat {
        WireFormat::DriverCall
    }

    fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply> {
        Box::pin(async move {
            let payload = build_payload(&call);
            post_for_reply(&self.transport, &call, payload, extract_reply).await
        })
    }
}
