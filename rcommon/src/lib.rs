//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use rcommon::{GenerationOptions, UserId};
//!
//! let user = UserId::from("user-1");
//! let options = GenerationOptions::default();
//!
//! assert_eq!(user.as_str(), "user-1");
//! assert_eq!(options.max_tokens, 4096);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use rcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Identity newtypes shared across crates.
    //!
    //! ```rust
    //! use rcommon::UserId;
    //!
    //! let user = UserId::new("1234");
    //! assert_eq!(user.to_string(), "1234");
    //! ```

    use std::fmt::{Display, Formatter};

    /// Identity of the sender of an inbound message, as reported by the messaging transport.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct UserId(String);

    impl UserId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for UserId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for UserId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for UserId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    impl From<u64> for UserId {
        fn from(value: u64) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Generation settings sent with every provider call.
    //!
    //! These are process-wide constants rather than user settings: every adapter
    //! asks for the same generous output budget.
    //!
    //! ```rust
    //! use rcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default().with_temperature(0.2);
    //!
    //! assert_eq!(options.temperature, 0.2);
    //! assert_eq!(options.max_tokens, 4096);
    //! ```

    pub const DEFAULT_TEMPERATURE: f64 = 0.7;
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct GenerationOptions {
        pub temperature: f64,
        pub max_tokens: u32,
    }

    impl Default for GenerationOptions {
        fn default() -> Self {
            Self {
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
            }
        }
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f64) -> Self {
            self.temperature = temperature;
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = max_tokens;
            self
        }
    }
}

pub mod registry {
    //! Ordered lookup tables keyed by small `Copy` identifiers.
    //!
    //! Iteration follows key order, so listings built from a registry are
    //! stable regardless of registration order.
    //!
    //! ```rust
    //! use rcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert(2_u8, "second");
    //! registry.insert(1_u8, "first");
    //!
    //! assert_eq!(registry.get(1), Some(&"first"));
    //! assert_eq!(registry.values().copied().collect::<Vec<_>>(), ["first", "second"]);
    //! ```

    use std::collections::BTreeMap;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        entries: BTreeMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V> {
        fn default() -> Self {
            Self {
                entries: BTreeMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Copy + Ord,
    {
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns the entry that was replaced, if any.
        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.entries.insert(key, value)
        }

        pub fn get(&self, key: K) -> Option<&V> {
            self.entries.get(&key)
        }

        pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
            self.entries.keys().copied()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.entries.values()
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }
}

pub use context::UserId;
pub use future::BoxFuture;
pub use model::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationOptions};
pub use registry::Registry;
