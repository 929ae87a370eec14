//! Provider-agnostic identity, message, and reply types.
//!
//! ```rust
//! use rprovider::{Candidate, Message, ProviderId, Reply, Role};
//!
//! let candidate = Candidate::new(ProviderId::Groq, "llama-3.1-8b-instant");
//! assert_eq!(candidate.to_string(), "groq/llama-3.1-8b-instant");
//!
//! let message = Message::new(Role::User, "hello");
//! assert_eq!(message.role.as_str(), "user");
//!
//! assert!(Reply::from_text("   ").is_no_answer());
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rcommon::BoxFuture;

use crate::ProviderError;

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    Groq,
    OpenRouter,
    Pollinations,
    Gemini,
    Cerebras,
    Cloudflare,
    HuggingFace,
    Cohere,
    SiliconFlow,
    Routeway,
    Mlvoca,
    Puter,
}

impl ProviderId {
    pub const ALL: [ProviderId; 12] = [
        Self::Groq,
        Self::OpenRouter,
        Self::Pollinations,
        Self::Gemini,
        Self::Cerebras,
        Self::Cloudflare,
        Self::HuggingFace,
        Self::Cohere,
        Self::SiliconFlow,
        Self::Routeway,
        Self::Mlvoca,
        Self::Puter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenRouter => "openrouter",
            Self::Pollinations => "pollinations",
            Self::Gemini => "gemini",
            Self::Cerebras => "cerebras",
            Self::Cloudflare => "cloudflare",
            Self::HuggingFace => "huggingface",
            Self::Cohere => "cohere",
            Self::SiliconFlow => "siliconflow",
            Self::Routeway => "routeway",
            Self::Mlvoca => "mlvoca",
            Self::Puter => "puter",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_provider_id(value)
    }
}

/// Case-insensitive provider lookup by its catalog name.
pub fn parse_provider_id(name: &str) -> Result<ProviderId, ProviderError> {
    let normalized = name.trim().to_ascii_lowercase();
    ProviderId::ALL
        .into_iter()
        .find(|id| id.as_str() == normalized)
        .ok_or_else(|| ProviderError::unknown_provider(name.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Reasoning,
    Search,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Self::Normal, Self::Reasoning, Self::Search];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reasoning => "reasoning",
            Self::Search => "search",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ProviderError> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ProviderError::unknown_mode(value.trim()))
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A provider/model pair tried as one step of a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub provider: ProviderId,
    pub model: String,
}

impl Candidate {
    pub fn new(provider: ProviderId, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    NoAnswer,
}

impl Reply {
    /// Blank text collapses to `NoAnswer`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::NoAnswer
        } else {
            Self::Text(text)
        }
    }

    pub fn from_optional(text: Option<String>) -> Self {
        text.map(Self::from_text).unwrap_or(Self::NoAnswer)
    }

    pub fn is_no_answer(&self) -> bool {
        matches!(self, Self::NoAnswer)
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::NoAnswer => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WireFormat {
    GenericCompletion,
    ContentGeneration,
    MessageArray,
    DriverCall,
    RawGenerate,
}

impl Display for WireFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::GenericCompletion => "generic_completion",
            Self::ContentGeneration => "content_generation",
            Self::MessageArray => "message_array",
            Self::DriverCall => "driver_call",
            Self::RawGenerate => "raw_generate",
        };

        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!(parse_provider_id("GROQ").ok(), Some(ProviderId::Groq));
        assert_eq!(" OpenRouter ".parse::<ProviderId>().ok(), Some(ProviderId::OpenRouter));

        for id in ProviderId::ALL {
            assert_eq!(parse_provider_id(id.as_str()).ok(), Some(id));
        }

        let error = parse_provider_id("openai").expect_err("openai is not in the catalog");
        assert_eq!(error.kind, ProviderErrorKind::UnknownProvider);
    }

    #[test]
    fn modes_parse_and_reject_unknown_names() {
        assert_eq!(Mode::parse("Reasoning").ok(), Some(Mode::Reasoning));
        assert_eq!(Mode::default(), Mode::Normal);

        let error = Mode::parse("creative").expect_err("unknown mode");
        assert_eq!(error.kind, ProviderErrorKind::UnknownMode);
    }

    #[test]
    fn reply_treats_blank_text_as_no_answer() {
        assert_eq!(Reply::from_text("hi"), Reply::Text("hi".to_string()));
        assert!(Reply::from_text("\n\t ").is_no_answer());
        assert!(Reply::from_optional(None).is_no_answer());
        assert_eq!(Reply::from_optional(Some("ok".into())).into_text().as_deref(), Some("ok"));
    }

    #[test]
    fn roles_round_trip_through_wire_names() {
        for role in [Role::System, Role::User, Role::Assistant] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("tool"), None);
    }
}
