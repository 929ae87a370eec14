//! Adapter registry keyed by wire format.
//!
//! ```rust
//! use rprovider::AdapterRegistry;
//!
//! let registry = AdapterRegistry::new();
//! assert!(registry.is_empty());
//! assert_eq!(registry.len(), 0);
//! ```

use std::sync::Arc;

use rcommon::Registry;

use crate::adapters::{
    ChatAdapter, ContentGenerationAdapter, DriverCallAdapter, GenericCompletionAdapter,
    MessageArrayAdapter, RawGenerateAdapter,
};
use crate::{HttpTransport, WireFormat};

#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: Registry<WireFormat, Arc<dyn ChatAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One adapter per wire format, all sharing `transport`.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        let mut registry = Self::new();
        registry.register(GenericCompletionAdapter::new(Arc::clone(&transport)));
        registry.register(MessageArrayAdapter::new(Arc::clone(&transport)));
        registry.register(ContentGenerationAdapter::new(Arc::clone(&transport)));
        registry.register(RawGenerateAdapter::new(Arc::clone(&transport)));
        registry.register(DriverCallAdapter::new(transport));
        registry
    }

    pub fn register<A>(&mut self, adapter: A)
    where
        A: ChatAdapter + 'static,
    {
        self.adapters.insert(adapter.wire_format(), Arc::new(adapter));
    }

    pub fn get(&self, format: WireFormat) -> Option<Arc<dyn ChatAdapter>> {
        self.adapters.get(format).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formats = self
            .adapters
            .keys()
            .map(|format| format.to_string())
            .collect::<Vec<_>>();
        f.debug_struct("AdapterRegistry")
            .field("formats", &formats)
            .finish()
    }
}
