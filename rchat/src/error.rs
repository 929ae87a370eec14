//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rprovider::{ChainExhausted, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Provider,
    Exhausted,
    Store,
}

impl ChatErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Exhausted => "exhausted",
            Self::Store => "store",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Exhausted, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn is_store(&self) -> bool {
        self.kind == ChatErrorKind::Store
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        ChatError::provider(value.to_string())
    }
}

impl From<ChainExhausted> for ChatError {
    fn from(value: ChainExhausted) -> Self {
        ChatError::exhausted(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_message() {
        let error = ChatError::from(ProviderError::unknown_provider("nope"));
        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert!(error.message.contains("nope"));
    }

    #[test]
    fn exhausted_chain_converts() {
        let error = ChatError::from(ChainExhausted { attempts: Vec::new() });
        assert_eq!(error.kind, ChatErrorKind::Exhausted);
        assert_eq!(error.to_string(), "Exhausted: all 0 candidates failed (0 called)");
    }
}
