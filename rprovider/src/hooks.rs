//! Attempt outcomes and dispatch hook contracts.

use std::time::Duration;

use crate::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A required secret is not configured.
    Unavailable,
    NotCatalogued,
    NoAdapter,
    /// Endpoint or headers could not be built from the configured secrets.
    Unresolvable,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::NotCatalogued => "not_catalogued",
            Self::NoAdapter => "no_adapter",
            Self::Unresolvable => "unresolvable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Skipped(SkipReason),
    NoAnswer,
    TimedOut,
    Answered,
}

impl AttemptOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skipped(_) => "skipped",
            Self::NoAnswer => "no_answer",
            Self::TimedOut => "timed_out",
            Self::Answered => "answered",
        }
    }

    /// Whether a network call was made for this attempt.
    pub fn was_called(self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub candidate: Candidate,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

impl AttemptRecord {
    pub fn new(candidate: Candidate, outcome: AttemptOutcome, elapsed: Duration) -> Self {
        Self {
            candidate,
            outcome,
            elapsed,
        }
    }
}

pub trait DispatchHooks: Send + Sync {
    fn on_attempt_start(&self, _candidate: &Candidate, _position: usize) {}

    fn on_attempt_finished(&self, _record: &AttemptRecord) {}

    fn on_chain_answered(&self, _candidate: &Candidate, _attempts: &[AttemptRecord]) {}

    fn on_chain_exhausted(&self, _attempts: &[AttemptRecord]) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDispatchHooks;

impl DispatchHooks for NoopDispatchHooks {}
