//! Metrics-based dispatch hooks.
//!
//! Counters are labelled by provider and model; the chain-level histogram
//! records how far down a chain a turn had to go.

use rprovider::{AttemptOutcome, AttemptRecord, Candidate, DispatchHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsDispatchHooks;

impl DispatchHooks for MetricsDispatchHooks {
    fn on_attempt_start(&self, candidate: &Candidate, _position: usize) {
        metrics::counter!(
            "relaybot_dispatch_attempt_start_total",
            "provider" => candidate.provider.to_string(),
            "model" => candidate.model.clone()
        )
        .increment(1);
    }

    fn on_attempt_finished(&self, record: &AttemptRecord) {
        let reason = match record.outcome {
            AttemptOutcome::Skipped(reason) => reason.as_str(),
            _ => "",
        };
        metrics::counter!(
            "relaybot_dispatch_attempt_finished_total",
            "provider" => record.candidate.provider.to_string(),
            "model" => record.candidate.model.clone(),
            "outcome" => record.outcome.as_str(),
            "reason" => reason
        )
        .increment(1);

        if record.outcome.was_called() {
            metrics::histogram!(
                "relaybot_dispatch_attempt_duration_seconds",
                "provider" => record.candidate.provider.to_string(),
                "outcome" => record.outcome.as_str()
            )
            .record(record.elapsed.as_secs_f64());
        }
    }

    fn on_chain_answered(&self, candidate: &Candidate, attempts: &[AttemptRecord]) {
        metrics::counter!(
            "relaybot_dispatch_chain_answered_total",
            "provider" => candidate.provider.to_string()
        )
        .increment(1);
        metrics::histogram!("relaybot_dispatch_attempts_per_answer").record(attempts.len() as f64);
    }

    fn on_chain_exhausted(&self, attempts: &[AttemptRecord]) {
        metrics::counter!("relaybot_dispatch_chain_exhausted_total").increment(1);
        metrics::histogram!("relaybot_dispatch_attempts_per_exhaustion")
            .record(attempts.len() as f64);
    }
}
