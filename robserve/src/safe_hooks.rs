use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use rprovider::{AttemptRecord, Candidate, DispatchHooks};

/// Contains panics raised by the wrapped hooks so dispatch always continues.
pub struct SafeDispatchHooks<H> {
    inner: H,
}

impl<H> SafeDispatchHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> DispatchHooks for SafeDispatchHooks<H>
where
    H: DispatchHooks,
{
    fn on_attempt_start(&self, candidate: &Candidate, position: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(candidate, position)
        }));
    }

    fn on_attempt_finished(&self, record: &AttemptRecord) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_attempt_finished(record)));
    }

    fn on_chain_answered(&self, candidate: &Candidate, attempts: &[AttemptRecord]) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_chain_answered(candidate, attempts)
        }));
    }

    fn on_chain_exhausted(&self, attempts: &[AttemptRecord]) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_chain_exhausted(attempts)));
    }
}

/// Forwards every event to each hook in order.
#[derive(Clone, Default)]
pub struct FanoutDispatchHooks {
    hooks: Vec<Arc<dyn DispatchHooks>>,
}

impl FanoutDispatchHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn DispatchHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl DispatchHooks for FanoutDispatchHooks {
    fn on_attempt_start(&self, candidate: &Candidate, position: usize) {
        for hooks in &self.hooks {
            hooks.on_attempt_start(candidate, position);
        }
    }

    fn on_attempt_finished(&self, record: &AttemptRecord) {
        for hooks in &self.hooks {
            hooks.on_attempt_finished(record);
        }
    }

    fn on_chain_answered(&self, candidate: &Candidate, attempts: &[AttemptRecord]) {
        for hooks in &self.hooks {
            hooks.on_chain_answered(candidate, attempts);
        }
    }

    fn on_chain_exhausted(&self, attempts: &[AttemptRecord]) {
        for hooks in &self.hooks {
            hooks.on_chain_exhausted(attempts);
        }
    }
}
