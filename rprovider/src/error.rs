//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use rprovider::{ProviderError, ProviderErrorKind};
//!
//! let missing = ProviderError::credential_missing("groq key not configured");
//! assert_eq!(missing.kind, ProviderErrorKind::CredentialMissing);
//!
//! let upstream = ProviderError::transport("bad gateway").with_status(502);
//! assert_eq!(upstream.status, Some(502));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    CredentialMissing,
    Transport,
    Timeout,
    MalformedResponse,
    UnknownProvider,
    UnknownMode,
    Other,
}

impl ProviderErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CredentialMissing => "credential_missing",
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::MalformedResponse => "malformed_response",
            Self::UnknownProvider => "unknown_provider",
            Self::UnknownMode => "unknown_mode",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn credential_missing(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::CredentialMissing, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message)
    }

    pub fn unknown_provider(name: &str) -> Self {
        Self::new(
            ProviderErrorKind::UnknownProvider,
            format!("unknown provider '{name}'"),
        )
    }

    pub fn unknown_mode(name: &str) -> Self {
        Self::new(ProviderErrorKind::UnknownMode, format!("unknown mode '{name}'"))
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} (HTTP {status}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_when_present() {
        let plain = ProviderError::timeout("took too long");
        assert_eq!(plain.to_string(), "Timeout: took too long");

        let with_status = ProviderError::transport("rate limited").with_status(429);
        assert_eq!(with_status.to_string(), "Transport (HTTP 429): rate limited");
    }

    #[test]
    fn unknown_lookups_name_the_offending_value() {
        let provider = ProviderError::unknown_provider("nope");
        assert_eq!(provider.kind, ProviderErrorKind::UnknownProvider);
        assert!(provider.message.contains("nope"));

        let mode = ProviderError::unknown_mode("fast");
        assert_eq!(mode.kind.as_str(), "unknown_mode");
    }
}
