//! In-memory secret storage keyed by secret name.
//!
//! Provider descriptors and search backends name the secrets they need
//! (`"groq"`, `"cloudflare_account"`, `"tavily"`, ...); the store only knows
//! names and values.
//!
//! ```rust
//! use rprovider::CredentialStore;
//!
//! let store = CredentialStore::new();
//! store.set_secret("groq", "gsk-test").expect("secret should store");
//!
//! assert!(store.has_secret("groq"));
//! assert!(!store.has_secret("cohere"));
//! assert_eq!(store.secret("groq").as_deref(), Some("gsk-test"));
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::ProviderError;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zeroes are valid UTF-8 and the string is never read again.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[derive(Default)]
pub struct CredentialStore {
    secrets: Mutex<HashMap<String, SecretString>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        f.debug_struct("CredentialStore")
            .field("secrets", &names)
            .finish()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a trimmed secret. Blank values are rejected.
    pub fn set_secret(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let name = name.into();
        let value = value.into();
        let secret = SecretString::new(value.trim());
        if secret.is_empty() {
            return Err(ProviderError::credential_missing(format!(
                "secret '{name}' must not be empty"
            )));
        }

        self.secrets_mut()?.insert(name, secret);
        Ok(())
    }

    pub fn has_secret(&self, name: &str) -> bool {
        self.secrets_ref()
            .map(|secrets| secrets.get(name).is_some_and(|secret| !secret.is_empty()))
            .unwrap_or(false)
    }

    pub fn with_secret<R>(&self, name: &str, f: impl FnOnce(&str) -> R) -> Option<R> {
        let secrets = self.secrets_ref().ok()?;
        secrets
            .get(name)
            .filter(|secret| !secret.is_empty())
            .map(|secret| f(secret.expose()))
    }

    /// Copies the secret out. Prefer [`CredentialStore::with_secret`] where a borrow is enough.
    pub fn secret(&self, name: &str) -> Option<String> {
        self.with_secret(name, str::to_string)
    }

    pub fn require(&self, name: &str) -> Result<String, ProviderError> {
        self.secret(name).ok_or_else(|| {
            ProviderError::credential_missing(format!("secret '{name}' is not configured"))
        })
    }

    pub fn clear(&self, name: &str) -> Result<bool, ProviderError> {
        Ok(self.secrets_mut()?.remove(name).is_some())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names = self
            .secrets_ref()
            .map(|secrets| secrets.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn secrets_ref(&self) -> Result<MutexGuard<'_, HashMap<String, SecretString>>, ProviderError> {
        self.secrets
            .lock()
            .map_err(|_| ProviderError::other("credential store lock poisoned"))
    }

    fn secrets_mut(&self) -> Result<MutexGuard<'_, HashMap<String, SecretString>>, ProviderError> {
        self.secrets
            .lock()
            .map_err(|_| ProviderError::other("credential store lock poisoned"))
    }
}
