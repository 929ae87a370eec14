//! Observability hooks for fallback dispatch.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use robserve::{FanoutDispatchHooks, MetricsDispatchHooks, SafeDispatchHooks, TracingDispatchHooks};
//!
//! let hooks = SafeDispatchHooks::new(
//!     FanoutDispatchHooks::new()
//!         .with(Arc::new(TracingDispatchHooks))
//!         .with(Arc::new(MetricsDispatchHooks)),
//! );
//! let _ = hooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsDispatchHooks;
pub use safe_hooks::{FanoutDispatchHooks, SafeDispatchHooks};
pub use tracing_hooks::TracingDispatchHooks;

pub mod prelude {
    pub use crate::{
        FanoutDispatchHooks, MetricsDispatchHooks, SafeDispatchHooks, TracingDispatchHooks,
    };
}
