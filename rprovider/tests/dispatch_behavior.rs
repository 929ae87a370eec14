use std::sync::{Arc, Mutex};

use rprovider::{
    AdapterRegistry, AttemptOutcome, AttemptRecord, Candidate, CredentialResolver,
    CredentialStore, DispatchHooks, Dispatcher, FallbackChains, HttpRequest, HttpTransport,
    Message, Mode, ProviderCatalog, ProviderError, ProviderFuture, ProviderId, SkipReason,
};
use serde_json::{Value, json};

/// Routes by URL substring; unmatched URLs fail like an unreachable host.
#[derive(Debug, Default)]
struct RoutedTransport {
    routes: Vec<(&'static str, Result<Value, ProviderError>)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedTransport {
    fn with_route(mut self, fragment: &'static str, outcome: Result<Value, ProviderError>) -> Self {
        self.routes.push((fragment, outcome));
        self
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpTransport for RoutedTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> ProviderFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let outcome = self
                .routes
                .iter()
                .find(|(fragment, _)| request.url.contains(fragment))
                .map(|(_, outcome)| outcome.clone())
                .unwrap_or_else(|| Err(ProviderError::transport("connection refused")));
            self.requests.lock().expect("requests lock").push(request);
            outcome
        })
    }
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl DispatchHooks for RecordingHooks {
    fn on_attempt_start(&self, candidate: &Candidate, position: usize) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("start:{position}:{candidate}"));
    }

    fn on_attempt_finished(&self, record: &AttemptRecord) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("finish:{}:{}", record.candidate, record.outcome.as_str()));
    }

    fn on_chain_answered(&self, candidate: &Candidate, attempts: &[AttemptRecord]) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("answered:{candidate}:{}", attempts.len()));
    }

    fn on_chain_exhausted(&self, attempts: &[AttemptRecord]) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("exhausted:{}", attempts.len()));
    }
}

fn resolver(secrets: &[(&str, &str)]) -> CredentialResolver {
    let store = CredentialStore::new();
    for (name, value) in secrets {
        store.set_secret(*name, *value).expect("secret should store");
    }
    CredentialResolver::new(Arc::new(ProviderCatalog::builtin()), Arc::new(store))
}

fn completion(text: &str) -> Result<Value, ProviderError> {
    Ok(json!({"choices": [{"message": {"role": "assistant", "content": text}}]}))
}

#[tokio::test]
async fn normal_chain_falls_through_failures_to_third_candidate() {
    let transport = Arc::new(
        RoutedTransport::default()
            .with_route(
                "api.groq.com",
                Err(ProviderError::transport("rate limited").with_status(429)),
            )
            .with_route("openrouter.ai", completion("hi there")),
    );
    let hooks = Arc::new(RecordingHooks::default());
    let dispatcher = Dispatcher::new(
        resolver(&[("groq", "gsk"), ("openrouter", "sk-or")]),
        AdapterRegistry::with_transport(transport.clone()),
    )
    .with_hooks(hooks.clone());

    let chains = FallbackChains::default();
    let reply = dispatcher
        .try_chain(chains.chain(Mode::Normal), &[Message::user("hello")])
        .await
        .expect("third candidate answers");

    assert_eq!(reply.text, "hi there");
    assert_eq!(
        reply.candidate,
        Candidate::new(ProviderId::OpenRouter, "meta-llama/llama-4-scout:free")
    );
    assert_eq!(transport.urls().len(), 3);

    let events = hooks.events.lock().expect("events lock").clone();
    assert_eq!(
        events.first().map(String::as_str),
        Some("start:0:groq/llama-3.3-70b-versatile")
    );
    assert!(events.contains(&"finish:groq/llama-3.1-8b-instant:no_answer".to_string()));
    assert_eq!(
        events.last().map(String::as_str),
        Some("answered:openrouter/meta-llama/llama-4-scout:free:3")
    );
}

#[tokio::test]
async fn exhausted_chain_calls_only_available_providers() {
    let transport = Arc::new(RoutedTransport::default());
    let hooks = Arc::new(RecordingHooks::default());
    let dispatcher = Dispatcher::new(
        resolver(&[]),
        AdapterRegistry::with_transport(transport.clone()),
    )
    .with_hooks(hooks.clone());

    let chains = FallbackChains::default();
    let exhausted = dispatcher
        .try_chain(chains.chain(Mode::Normal), &[Message::user("hello")])
        .await
        .expect_err("no candidate answers");

    assert_eq!(exhausted.attempts.len(), chains.chain(Mode::Normal).len());
    assert!(transport.urls().iter().all(|url| url.contains("pollinations.ai")));
    assert_eq!(exhausted.called(), 2);
    assert_eq!(
        exhausted.attempts[0].outcome,
        AttemptOutcome::Skipped(SkipReason::Unavailable)
    );

    let events = hooks.events.lock().expect("events lock").clone();
    assert_eq!(
        events.last().map(String::as_str),
        Some(format!("exhausted:{}", chains.chain(Mode::Normal).len()).as_str())
    );
}

#[tokio::test]
async fn unavailable_override_is_skipped_without_network_call() {
    let transport = Arc::new(RoutedTransport::default().with_route("pollinations.ai", completion("ok")));
    let resolver = resolver(&[]);
    let dispatcher = Dispatcher::new(
        resolver.clone(),
        AdapterRegistry::with_transport(transport.clone()),
    );

    let pinned = Candidate::new(ProviderId::Cohere, "command-a");
    let plan = FallbackChains::default().plan("normal", Some(&pinned), &resolver);
    assert!(plan.pinned.is_none());

    let reply = dispatcher
        .run_plan(&plan, &[Message::user("hello")])
        .await
        .expect("pollinations answers");

    assert_eq!(reply.candidate.provider, ProviderId::Pollinations);
    assert!(transport.urls().iter().all(|url| !url.contains("cohere")));
}

#[tokio::test]
async fn available_override_is_tried_first_and_wins() {
    let transport = Arc::new(
        RoutedTransport::default()
            .with_route("api.cohere.ai", Ok(json!({"message": {"content": [{"text": "pinned"}]}}))),
    );
    let resolver = resolver(&[("cohere", "co-key")]);
    let dispatcher = Dispatcher::new(
        resolver.clone(),
        AdapterRegistry::with_transport(transport.clone()),
    );

    let pinned = Candidate::new(ProviderId::Cohere, "command-a");
    let plan = FallbackChains::default().plan("reasoning", Some(&pinned), &resolver);
    let reply = dispatcher
        .run_plan(&plan, &[Message::system("sys"), Message::user("hello")])
        .await
        .expect("pinned provider answers");

    assert_eq!(reply.text, "pinned");
    assert_eq!(reply.attempts.len(), 1);

    let requests = transport.requests.lock().expect("requests lock");
    assert_eq!(requests[0].header("Authorization"), Some("Bearer co-key"));
    assert_eq!(requests[0].header("X-Client-Name"), Some("relaybot"));
}

#[tokio::test]
async fn per_model_endpoints_receive_resolved_urls() {
    let transport = Arc::new(
        RoutedTransport::default()
            .with_route("api.cloudflare.com", Ok(json!({"result": {"response": "edge"}})))
            .with_route(
                "generativelanguage.googleapis.com",
                Ok(json!({"candidates": [{"content": {"parts": [{"text": "gem"}]}}]})),
            ),
    );
    let dispatcher = Dispatcher::new(
        resolver(&[
            ("cloudflare", "cf"),
            ("cloudflare_account", "acct-9"),
            ("gemini", "g-key"),
        ]),
        AdapterRegistry::with_transport(transport.clone()),
    );

    let cloudflare = dispatcher
        .try_chain(
            &[Candidate::new(ProviderId::Cloudflare, "@cf/meta/llama-3.1-8b-instruct")],
            &[Message::user("hi")],
        )
        .await
        .expect("cloudflare answers");
    assert_eq!(cloudflare.text, "edge");

    let gemini = dispatcher
        .try_chain(
            &[Candidate::new(ProviderId::Gemini, "gemini-2.5-flash")],
            &[Message::user("hi")],
        )
        .await
        .expect("gemini answers");
    assert_eq!(gemini.text, "gem");

    let requests = transport.requests.lock().expect("requests lock");
    assert_eq!(
        requests[0].url,
        "https://api.cloudflare.com/client/v4/accounts/acct-9/ai/run/@cf/meta/llama-3.1-8b-instruct"
    );
    assert!(requests[0].body.as_ref().is_some_and(|body| body.get("model").is_none()));
    assert_eq!(requests[1].header("x-goog-api-key"), Some("g-key"));
    assert!(requests[1].url.contains("gemini-2.5-flash:generateContent"));
}

#[tokio::test]
async fn pinned_chain_member_is_called_once() {
    let transport = Arc::new(
        RoutedTransport::default()
            .with_route(
                "api.groq.com",
                Err(ProviderError::transport("overloaded").with_status(503)),
            )
            .with_route("openrouter.ai", completion("hi there")),
    );
    let resolver = resolver(&[("groq", "gsk"), ("openrouter", "sk-or")]);
    let dispatcher = Dispatcher::new(
        resolver.clone(),
        AdapterRegistry::with_transport(transport.clone()),
    );

    let pinned = Candidate::new(ProviderId::Groq, "llama-3.3-70b-versatile");
    let plan = FallbackChains::default().plan("normal", Some(&pinned), &resolver);
    let reply = dispatcher
        .run_plan(&plan, &[Message::user("hello")])
        .await
        .expect("openrouter answers");
    assert_eq!(reply.text, "hi there");

    let models = transport
        .requests
        .lock()
        .expect("requests lock")
        .iter()
        .filter_map(|request| request.body.as_ref()?["model"].as_str().map(str::to_string))
        .collect::<Vec<_>>();
    assert_eq!(
        models,
        vec![
            "llama-3.3-70b-versatile",
            "llama-3.1-8b-instant",
            "meta-llama/llama-4-scout:free"
        ]
    );
}
