//! Wire-format adapters.
//!
//! One adapter per [`WireFormat`] family. Each exposes a pure `build_payload`
//! and `extract_reply` pair and implements [`ChatAdapter`] over a shared
//! [`HttpTransport`]. Transport and decoding failures are logged here and
//! reported upward as [`Reply::NoAnswer`].

use std::sync::Arc;
use std::time::Duration;

use rcommon::GenerationOptions;
use serde::Serialize;
use serde_json::Value;

use crate::{
    Candidate, HttpRequest, HttpTransport, Message, ProviderError, ProviderFuture, Reply, Role,
    WireFormat,
};

pub mod content_generation;
pub mod driver_call;
pub mod generic;
pub mod message_array;
pub mod raw_generate;

pub use content_generation::ContentGenerationAdapter;
pub use driver_call::{DriverCallAdapter, PuterDriver, driver_for_model};
pub use generic::GenericCompletionAdapter;
pub use message_array::MessageArrayAdapter;
pub use raw_generate::RawGenerateAdapter;

/// Everything an adapter needs for one attempt, already resolved by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterCall {
    pub candidate: Candidate,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
    pub timeout: Duration,
    /// The endpoint URL already names the model, so payloads omit it.
    pub model_in_endpoint: bool,
}

impl AdapterCall {
    pub fn new(candidate: Candidate, url: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            candidate,
            url: url.into(),
            headers: Vec::new(),
            messages,
            options: GenerationOptions::default(),
            timeout: crate::DEFAULT_REQUEST_TIMEOUT,
            model_in_endpoint: false,
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_model_in_endpoint(mut self, model_in_endpoint: bool) -> Self {
        self.model_in_endpoint = model_in_endpoint;
        self
    }

    pub fn model(&self) -> &str {
        self.candidate.model.as_str()
    }
}

pub trait ChatAdapter: Send + Sync {
    fn wire_format(&self) -> WireFormat;

    fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply>;
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.as_str(),
        }
    }
}

pub(crate) fn wire_messages(messages: &[Message]) -> Vec<WireMessage<'_>> {
    messages.iter().map(WireMessage::from).collect()
}

pub(crate) fn last_with_role(messages: &[Message], role: Role) -> Option<&Message> {
    messages.iter().rev().find(|message| message.role == role)
}

pub(crate) fn to_payload<T: Serialize>(payload: &T) -> Result<Value, ProviderError> {
    serde_json::to_value(payload).map_err(|err| ProviderError::other(err.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ProviderError> {
    serde_json::from_value(body).map_err(|err| ProviderError::malformed_response(err.to_string()))
}

/// Sends `payload` as a POST to the call's endpoint and maps the body through `extract`.
pub(crate) async fn post_for_reply(
    transport: &Arc<dyn HttpTransport>,
    call: &AdapterCall,
    payload: Result<Value, ProviderError>,
    extract: fn(Value) -> Result<Reply, ProviderError>,
) -> Reply {
    let outcome = match payload {
        Ok(payload) => {
            let request = HttpRequest::post(call.url.clone(), payload)
                .with_headers(call.headers.clone())
                .with_timeout(call.timeout);
            transport.send(request).await.and_then(extract)
        }
        Err(error) => Err(error),
    };

    match outcome {
        Ok(reply) => {
            if reply.is_no_answer() {
                tracing::debug!(
                    phase = "adapter",
                    event = "empty_reply",
                    provider = %call.candidate.provider,
                    model = call.model()
                );
            }
            reply
        }
        Err(error) => {
            tracing::warn!(
                phase = "adapter",
                event = "call_failed",
                provider = %call.candidate.provider,
                model = call.model(),
                error_kind = error.kind.as_str(),
                status = error.status,
                error = %error
            );
            Reply::NoAnswer
        }
    }
}
