//! Tracing-based dispatch hooks.
//!
//! ```rust
//! use robserve::TracingDispatchHooks;
//! use rprovider::DispatchHooks;
//!
//! fn accepts_dispatch_hooks(_hooks: &dyn DispatchHooks) {}
//!
//! let hooks = TracingDispatchHooks;
//! accepts_dispatch_hooks(&hooks);
//! ```

use rprovider::{AttemptOutcome, AttemptRecord, Candidate, DispatchHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatchHooks;

impl DispatchHooks for TracingDispatchHooks {
    fn on_attempt_start(&self, candidate: &Candidate, position: usize) {
        tracing::debug!(
            phase = "dispatch",
            event = "attempt_start",
            provider = %candidate.provider,
            model = candidate.model.as_str(),
            position
        );
    }

    fn on_attempt_finished(&self, record: &AttemptRecord) {
        let elapsed_ms = record.elapsed.as_millis() as u64;
        match record.outcome {
            AttemptOutcome::Skipped(reason) => tracing::debug!(
                phase = "dispatch",
                event = "attempt_skipped",
                provider = %record.candidate.provider,
                model = record.candidate.model.as_str(),
                reason = reason.as_str()
            ),
            AttemptOutcome::Answered => tracing::info!(
                phase = "dispatch",
                event = "attempt_answered",
                provider = %record.candidate.provider,
                model = record.candidate.model.as_str(),
                elapsed_ms
            ),
            outcome => tracing::warn!(
                phase = "dispatch",
                event = "attempt_failed",
                provider = %record.candidate.provider,
                model = record.candidate.model.as_str(),
                outcome = outcome.as_str(),
                elapsed_ms
            ),
        }
    }

    fn on_chain_answered(&self, candidate: &Candidate, attempts: &[AttemptRecord]) {
        tracing::info!(
            phase = "dispatch",
            event = "chain_answered",
            provider = %candidate.provider,
            model = candidate.model.as_str(),
            attempts = attempts.len(),
            fallback = attempts.iter().filter(|record| record.outcome.was_called()).count() > 1
        );
    }

    fn on_chain_exhausted(&self, attempts: &[AttemptRecord]) {
        tracing::error!(
            phase = "dispatch",
            event = "chain_exhausted",
            attempts = attempts.len(),
            called = attempts.iter().filter(|record| record.outcome.was_called()).count()
        );
    }
}
