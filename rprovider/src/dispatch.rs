//! Ordered fallback dispatch across provider candidates.
//!
//! Candidates are tried strictly in order, one network call each, with no
//! retries, racing or backoff. The first non-empty reply wins; every other
//! outcome is recorded and the walk moves on.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

use rcommon::GenerationOptions;

use crate::adapters::AdapterCall;
use crate::{
    AdapterRegistry, AttemptOutcome, AttemptRecord, Candidate, ChainPlan, CredentialResolver,
    DispatchHooks, Endpoint, Message, NoopDispatchHooks, Reply, SkipReason,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReply {
    pub text: String,
    pub candidate: Candidate,
    pub attempts: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainExhausted {
    pub attempts: Vec<AttemptRecord>,
}

impl ChainExhausted {
    /// Attempts that actually reached a provider.
    pub fn called(&self) -> usize {
        self.attempts
            .iter()
            .filter(|record| record.outcome.was_called())
            .count()
    }
}

impl Display for ChainExhausted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "all {} candidates failed ({} called)",
            self.attempts.len(),
            self.called()
        )
    }
}

impl Error for ChainExhausted {}

#[derive(Clone)]
pub struct Dispatcher {
    resolver: CredentialResolver,
    adapters: AdapterRegistry,
    hooks: Arc<dyn DispatchHooks>,
    options: GenerationOptions,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("resolver", &self.resolver)
            .field("adapters", &self.adapters)
            .field("options", &self.options)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(resolver: CredentialResolver, adapters: AdapterRegistry) -> Self {
        Self {
            resolver,
            adapters,
            hooks: Arc::new(NoopDispatchHooks),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn DispatchHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    pub async fn try_chain(
        &self,
        candidates: &[Candidate],
        messages: &[Message],
    ) -> Result<ChainReply, ChainExhausted> {
        let outcome = self.walk(candidates.iter(), messages).await;
        self.finish(outcome)
    }

    /// The pin first; the full chain runs only if the pin yields nothing.
    pub async fn run_plan(
        &self,
        plan: &ChainPlan,
        messages: &[Message],
    ) -> Result<ChainReply, ChainExhausted> {
        let outcome = self.walk(plan.candidates(), messages).await;
        self.finish(outcome)
    }

    async fn walk<'c>(
        &self,
        candidates: impl Iterator<Item = &'c Candidate>,
        messages: &[Message],
    ) -> (Option<(String, Candidate)>, Vec<AttemptRecord>) {
        let mut attempts = Vec::new();

        for (position, candidate) in candidates.enumerate() {
            self.hooks.on_attempt_start(candidate, position);
            let started = Instant::now();
            let (outcome, text) = self.attempt(candidate, messages).await;
            let record = AttemptRecord::new(candidate.clone(), outcome, started.elapsed());
            self.hooks.on_attempt_finished(&record);
            attempts.push(record);

            if let Some(text) = text {
                return (Some((text, candidate.clone())), attempts);
            }
        }

        (None, attempts)
    }

    fn finish(
        &self,
        (winner, attempts): (Option<(String, Candidate)>, Vec<AttemptRecord>),
    ) -> Result<ChainReply, ChainExhausted> {
        match winner {
            Some((text, candidate)) => {
                self.hooks.on_chain_answered(&candidate, &attempts);
                Ok(ChainReply {
                    text,
                    candidate,
                    attempts,
                })
            }
            None => {
                self.hooks.on_chain_exhausted(&attempts);
                Err(ChainExhausted { attempts })
            }
        }
    }

    async fn attempt(
        &self,
        candidate: &Candidate,
        messages: &[Message],
    ) -> (AttemptOutcome, Option<String>) {
        let catalog = self.resolver.catalog();
        let Some(descriptor) = catalog.get(candidate.provider) else {
            return (AttemptOutcome::Skipped(SkipReason::NotCatalogued), None);
        };
        if !descriptor.is_available(self.resolver.store()) {
            return (AttemptOutcome::Skipped(SkipReason::Unavailable), None);
        }
        let Some(adapter) = self.adapters.get(descriptor.wire_format) else {
            return (AttemptOutcome::Skipped(SkipReason::NoAdapter), None);
        };

        let store = self.resolver.store();
        let resolved = descriptor
            .endpoint_url(&candidate.model, store)
            .and_then(|url| Ok((url, descriptor.headers(store)?)));
        let (url, headers) = match resolved {
            Ok(parts) => parts,
            Err(error) => {
                tracing::warn!(
                    phase = "dispatch",
                    event = "resolve_failed",
                    provider = %candidate.provider,
                    model = candidate.model.as_str(),
                    error_kind = error.kind.as_str(),
                    error = %error
                );
                return (AttemptOutcome::Skipped(SkipReason::Unresolvable), None);
            }
        };

        let timeout = descriptor.timeout();
        let call = AdapterCall::new(candidate.clone(), url, messages.to_vec())
            .with_headers(headers)
            .with_options(self.options)
            .with_timeout(timeout)
            .with_model_in_endpoint(matches!(descriptor.endpoint, Endpoint::PerModel(_)));

        match tokio::time::timeout(timeout, adapter.complete(call)).await {
            Ok(Reply::Text(text)) => (AttemptOutcome::Answered, Some(text)),
            Ok(Reply::NoAnswer) => (AttemptOutcome::NoAnswer, None),
            Err(_) => (AttemptOutcome::TimedOut, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::adapters::ChatAdapter;
    use crate::{CredentialStore, ProviderCatalog, ProviderFuture, ProviderId, WireFormat};

    /// Answers by model name from a fixed script; unknown models get no answer.
    struct ScriptedAdapter {
        format: WireFormat,
        script: Vec<(&'static str, Reply)>,
        calls: Arc<Mutex<Vec<String>>>,
        delay: Option<Duration>,
    }

    impl ChatAdapter for ScriptedAdapter {
        fn wire_format(&self) -> WireFormat {
            self.format
        }

        fn complete<'a>(&'a self, call: AdapterCall) -> ProviderFuture<'a, Reply> {
            Box::pin(async move {
                self.calls
                    .lock()
                    .expect("calls lock")
                    .push(call.candidate.to_string());
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.script
                    .iter()
                    .find(|(model, _)| *model == call.model())
                    .map(|(_, reply)| reply.clone())
                    .unwrap_or(Reply::NoAnswer)
            })
        }
    }

    fn dispatcher(
        secrets: &[(&str, &str)],
        script: Vec<(&'static str, Reply)>,
    ) -> (Dispatcher, Arc<Mutex<Vec<String>>>) {
        let store = CredentialStore::new();
        for (name, value) in secrets {
            store.set_secret(*name, *value).expect("secret");
        }
        let resolver =
            CredentialResolver::new(Arc::new(ProviderCatalog::builtin()), Arc::new(store));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut adapters = AdapterRegistry::new();
        adapters.register(ScriptedAdapter {
            format: WireFormat::GenericCompletion,
            script,
            calls: Arc::clone(&calls),
            delay: None,
        });
        (Dispatcher::new(resolver, adapters), calls)
    }

    #[tokio::test]
    async fn first_non_empty_reply_wins() {
        let (dispatcher, calls) = dispatcher(
            &[("groq", "gsk")],
            vec![
                ("llama-3.1-8b-instant", Reply::Text("second".to_string())),
                ("openai", Reply::Text("third".to_string())),
            ],
        );
        let chain = vec![
            Candidate::new(ProviderId::Groq, "llama-3.3-70b-versatile"),
            Candidate::new(ProviderId::Groq, "llama-3.1-8b-instant"),
            Candidate::new(ProviderId::Pollinations, "openai"),
        ];

        let reply = dispatcher
            .try_chain(&chain, &[Message::user("hello")])
            .await
            .expect("chain should answer");

        assert_eq!(reply.text, "second");
        assert_eq!(reply.candidate, chain[1]);
        assert_eq!(reply.attempts.len(), 2);
        assert_eq!(reply.attempts[0].outcome, AttemptOutcome::NoAnswer);
        assert_eq!(calls.lock().expect("calls lock").len(), 2);
    }

    #[tokio::test]
    async fn unavailable_and_unserved_candidates_are_skipped_without_calls() {
        let (dispatcher, calls) = dispatcher(&[], vec![("openai", Reply::Text("ok".into()))]);
        let chain = vec![
            Candidate::new(ProviderId::Groq, "llama-3.3-70b-versatile"),
            Candidate::new(ProviderId::Mlvoca, "tinyllama"),
            Candidate::new(ProviderId::Pollinations, "openai"),
        ];

        let reply = dispatcher
            .try_chain(&chain, &[Message::user("hello")])
            .await
            .expect("pollinations should answer");

        let outcomes = reply
            .attempts
            .iter()
            .map(|record| record.outcome)
            .collect::<Vec<_>>();
        assert_eq!(
            outcomes,
            vec![
                AttemptOutcome::Skipped(SkipReason::Unavailable),
                AttemptOutcome::Skipped(SkipReason::NoAdapter),
                AttemptOutcome::Answered,
            ]
        );
        assert_eq!(
            *calls.lock().expect("calls lock"),
            vec!["pollinations/openai".to_string()]
        );
    }

    #[tokio::test]
    async fn exhausted_chain_reports_every_attempt() {
        let (dispatcher, _calls) = dispatcher(&[], Vec::new());
        let chain = vec![
            Candidate::new(ProviderId::Cohere, "command-a"),
            Candidate::new(ProviderId::Pollinations, "openai"),
        ];

        let exhausted = dispatcher
            .try_chain(&chain, &[Message::user("hello")])
            .await
            .expect_err("nothing answers");

        assert_eq!(exhausted.attempts.len(), 2);
        assert_eq!(exhausted.called(), 1);
        assert!(exhausted.to_string().contains("all 2 candidates failed"));

        let empty = dispatcher
            .try_chain(&[], &[Message::user("hello")])
            .await
            .expect_err("empty chain");
        assert!(empty.attempts.is_empty());
    }

    #[tokio::test]
    async fn run_plan_tries_pin_before_chain() {
        let (dispatcher, calls) = dispatcher(
            &[("groq", "gsk")],
            vec![("openai", Reply::Text("from chain".into()))],
        );
        let plan = ChainPlan::new(vec![Candidate::new(ProviderId::Pollinations, "openai")])
            .with_pin(Candidate::new(ProviderId::Groq, "qwen/qwen3-32b"));

        let reply = dispatcher
            .run_plan(&plan, &[Message::user("hi")])
            .await
            .expect("chain answers after the pin");

        assert_eq!(reply.text, "from chain");
        assert_eq!(
            *calls.lock().expect("calls lock"),
            vec![
                "groq/qwen/qwen3-32b".to_string(),
                "pollinations/openai".to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_adapter_times_out_and_chain_advances() {
        let store = CredentialStore::new();
        store.set_secret("groq", "gsk").expect("secret");
        let resolver =
            CredentialResolver::new(Arc::new(ProviderCatalog::builtin()), Arc::new(store));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut adapters = AdapterRegistry::new();
        adapters.register(ScriptedAdapter {
            format: WireFormat::GenericCompletion,
            script: vec![("llama-3.3-70b-versatile", Reply::Text("late".into()))],
            calls: Arc::clone(&calls),
            delay: Some(Duration::from_secs(120)),
        });
        let dispatcher = Dispatcher::new(resolver, adapters);

        let exhausted = dispatcher
            .try_chain(
                &[Candidate::new(ProviderId::Groq, "llama-3.3-70b-versatile")],
                &[Message::user("hi")],
            )
            .await
            .expect_err("times out");

        assert_eq!(exhausted.attempts[0].outcome, AttemptOutcome::TimedOut);
    }
}
