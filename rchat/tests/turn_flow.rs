use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rchat::{
    APOLOGY, ChatError, ChatFuture, ChatPolicy, ChatService, ConversationStore,
    InMemoryConversationStore, TurnRequest, UserId, UserSettings,
};
use rprovider::{
    AdapterRegistry, Candidate, CredentialResolver, CredentialStore, Dispatcher, HttpRequest, HttpTransport,
    Message, Mode, ProviderCatalog, ProviderError, ProviderFuture, ProviderId,
};
use rsearch::SearchAggregator;
use serde_json::{Value, json};

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

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn models_called(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|request| request.body?["model"].as_str().map(str::to_string))
            .collect()
    }

    fn bodies_to(&self, fragment: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|request| request.url.contains(fragment))
            .filter_map(|request| request.body)
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

fn completion(text: &str) -> Result<Value, ProviderError> {
    Ok(json!({"choices": [{"message": {"role": "assistant", "content": text}}]}))
}

struct Harness {
    service: ChatService,
    transport: Arc<RoutedTransport>,
    store: Arc<InMemoryConversationStore>,
}

fn harness(transport: RoutedTransport, secrets: &[(&str, &str)], policy: ChatPolicy) -> Harness {
    let transport = Arc::new(transport);
    let credentials = CredentialStore::new();
    for (name, value) in secrets {
        credentials.set_secret(*name, *value).expect("secret should store");
    }
    let credentials = Arc::new(credentials);
    let resolver = CredentialResolver::new(Arc::new(ProviderCatalog::builtin()), credentials.clone());
    let dispatcher = Dispatcher::new(resolver, AdapterRegistry::with_transport(transport.clone()));
    let store = Arc::new(InMemoryConversationStore::new());

    let service = ChatService::builder(dispatcher, store.clone())
        .search(Arc::new(SearchAggregator::new(transport.clone(), credentials)))
        .policy(policy)
        .build();

    Harness {
        service,
        transport,
        store,
    }
}

#[tokio::test]
async fn normal_turn_falls_back_and_persists_the_exchange() {
    let h = harness(
        RoutedTransport::default()
            .with_route("api.groq.com", Err(ProviderError::transport("overloaded").with_status(503)))
            .with_route("openrouter.ai", completion("hi there")),
        &[("groq", "gsk"), ("openrouter", "sk-or")],
        ChatPolicy::default(),
    );
    let user = UserId::new("42");

    let outcome = h
        .service
        .run_turn(TurnRequest::new(user.clone(), "hello"))
        .await
        .expect("openrouter answers");

    assert_eq!(outcome.text, "hi there");
    assert_eq!(outcome.answered_by.provider, ProviderId::OpenRouter);
    assert_eq!(outcome.fallback_from, None);
    assert!(!outcome.searched);
    assert_eq!(
        h.transport.models_called(),
        vec![
            "llama-3.3-70b-versatile",
            "llama-3.1-8b-instant",
            "meta-llama/llama-4-scout:free"
        ]
    );

    let stored = h.store.read_history(&user, 20).await.expect("history");
    assert_eq!(stored, vec![Message::user("hello"), Message::assistant("hi there")]);
}

#[tokio::test]
async fn exhausted_search_turn_apologizes_without_search_context() {
    let h = harness(RoutedTransport::default(), &[], ChatPolicy::default());
    let user = UserId::new("7");

    let reply = h.service.handle_command(&user, "!mode search").await;
    assert_eq!(reply.as_deref(), Some("Mode set to search."));

    let reply = h.service.handle_turn(&user, "what happened today?").await;
    assert_eq!(reply, APOLOGY);
    assert_eq!(h.store.count_messages(&user).await.expect("count"), 0);

    let requests = h.transport.requests();
    assert!(requests.iter().any(|request| request.url.contains("duckduckgo")));

    let chat_bodies = h.transport.bodies_to("pollinations.ai");
    assert!(!chat_bodies.is_empty());
    for body in chat_bodies {
        let messages = body["messages"].as_array().expect("messages array");
        let system_turns = messages.iter().filter(|m| m["role"] == "system").count();
        assert_eq!(system_turns, 1);
        assert_eq!(messages.len(), 2);
    }
}

#[tokio::test]
async fn search_results_follow_the_system_prompt() {
    let h = harness(
        RoutedTransport::default()
            .with_route(
                "duckduckgo.com",
                Ok(json!({
                    "Heading": "Rust",
                    "AbstractText": "Rust 1.93 released.",
                    "AbstractURL": "https://blog.rust-lang.org",
                    "RelatedTopics": []
                })),
            )
            .with_route("pollinations.ai", completion("<think>plan</think>Rust 1.93 is out.")),
        &[],
        ChatPolicy::default(),
    );
    let user = UserId::new("9");
    h.service.handle_command(&user, "!mode search").await;

    let outcome = h
        .service
        .run_turn(TurnRequest::new(user.clone(), "rust release"))
        .await
        .expect("pollinations answers");
    assert!(outcome.searched);
    assert_eq!(outcome.text, "Rust 1.93 is out.");

    let body = h.transport.bodies_to("pollinations.ai").remove(0);
    let messages = body["messages"].as_array().expect("messages array");
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "system");
    assert!(
        messages[1]["content"]
            .as_str()
            .is_some_and(|content| content.contains("Rust: Rust 1.93 released. (https://blog.rust-lang.org)"))
    );
    assert_eq!(messages[2]["content"], "rust release");

    let stored = h.store.read_history(&user, 20).await.expect("history");
    assert_eq!(stored[1], Message::assistant("Rust 1.93 is out."));
}

#[tokio::test]
async fn history_window_is_sent_between_prompt_and_new_message() {
    let h = harness(
        RoutedTransport::default().with_route("pollinations.ai", completion("ok")),
        &[],
        ChatPolicy {
            history_limit: 2,
            ..ChatPolicy::default()
        },
    );
    let user = UserId::new("h");
    for text in ["one", "two", "three"] {
        h.service.handle_turn(&user, text).await;
    }

    let last = h.transport.bodies_to("pollinations.ai").pop().expect("body");
    let contents = last["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .map(|message| message["content"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();

    assert_eq!(contents.len(), 4);
    assert_eq!(&contents[1..], ["two", "ok", "three"]);
}

#[tokio::test]
async fn stored_history_is_capped_at_the_window() {
    let h = harness(
        RoutedTransport::default().with_route("pollinations.ai", completion("ok")),
        &[],
        ChatPolicy {
            history_limit: 3,
            ..ChatPolicy::default()
        },
    );
    let user = UserId::new("cap");
    for text in ["one", "two", "three"] {
        h.service.handle_turn(&user, text).await;
    }

    assert_eq!(h.store.count_messages(&user).await.expect("count"), 3);
    assert_eq!(
        h.store.read_history(&user, 10).await.expect("history"),
        vec![Message::assistant("ok"), Message::user("three"), Message::assistant("ok")]
    );
}

#[tokio::test]
async fn auto_detect_switches_mode_only_for_an_opening_message() {
    let h = harness(
        RoutedTransport::default().with_route("pollinations.ai", completion("answer")),
        &[],
        ChatPolicy {
            auto_detect: true,
            ..ChatPolicy::default()
        },
    );
    let user = UserId::new("auto");

    let first = h
        .service
        .run_turn(TurnRequest::new(user.clone(), "please calculate 17 * 23"))
        .await
        .expect("answer");
    assert_eq!(first.mode, Mode::Reasoning);

    let second = h
        .service
        .run_turn(TurnRequest::new(user.clone(), "latest news please"))
        .await
        .expect("answer");
    assert_eq!(second.mode, Mode::Normal);
}

#[derive(Default)]
struct FailingAppends {
    inner: InMemoryConversationStore,
}

impl ConversationStore for FailingAppends {
    fn read_settings<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<Option<UserSettings>, ChatError>> {
        self.inner.read_settings(user)
    }

    fn write_settings<'a>(
        &'a self,
        user: &'a UserId,
        settings: &'a UserSettings,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        self.inner.write_settings(user, settings)
    }

    fn append_message<'a>(
        &'a self,
        _user: &'a UserId,
        _message: Message,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async { Err::<(), _>(ChatError::store("database is locked")) })
    }

    fn read_history<'a>(
        &'a self,
        user: &'a UserId,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<Message>, ChatError>> {
        self.inner.read_history(user, limit)
    }

    fn clear_history<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<usize, ChatError>> {
        self.inner.clear_history(user)
    }

    fn count_messages<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        self.inner.count_messages(user)
    }

    fn trim_history<'a>(
        &'a self,
        user: &'a UserId,
        keep: usize,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        self.inner.trim_history(user, keep)
    }
}

#[tokio::test]
async fn persistence_failures_do_not_change_the_reply() {
    let transport = Arc::new(RoutedTransport::default().with_route("pollinations.ai", completion("still here")));
    let resolver = CredentialResolver::new(
        Arc::new(ProviderCatalog::builtin()),
        Arc::new(CredentialStore::new()),
    );
    let dispatcher = Dispatcher::new(resolver, AdapterRegistry::with_transport(transport));
    let service = ChatService::builder(dispatcher, Arc::new(FailingAppends::default())).build();

    let reply = service.handle_turn(&UserId::new("p"), "hi").await;
    assert_eq!(reply, "still here");
}

#[tokio::test]
async fn commands_report_and_validate() {
    let h = harness(
        RoutedTransport::default(),
        &[("cohere", "co")],
        ChatPolicy::default(),
    );
    let user = UserId::new("cmd");

    assert_eq!(h.service.handle_command(&user, "hello").await, None);
    assert_eq!(h.service.handle_command(&user, "!unknown").await, None);

    let help = h.service.handle_command(&user, "!help").await.expect("help");
    assert!(help.contains("!models <provider>"));

    let providers = h.service.handle_command(&user, "!providers").await.expect("providers");
    assert!(providers.contains("cohere (Cohere) - ready"));
    assert!(providers.contains("groq (Groq) - not configured"));

    let unknown = h.service.handle_command(&user, "!provider nope").await.expect("reply");
    assert_eq!(unknown, "Unknown provider 'nope'. Try !providers.");

    let bad_mode = h.service.handle_command(&user, "!mode creative").await.expect("reply");
    assert!(bad_mode.starts_with("Unknown mode 'creative'."));

    let pinned = h.service.handle_command(&user, "!set Cohere").await.expect("reply");
    assert_eq!(pinned, "Now using cohere/command-a.");

    let wrong_model = h
        .service
        .handle_command(&user, "!provider cohere gpt-4o")
        .await
        .expect("reply");
    assert!(wrong_model.starts_with("Unknown model 'gpt-4o' for cohere."));

    let status = h.service.handle_command(&user, "!status").await.expect("status");
    assert!(status.contains("Provider: cohere"));
    assert!(status.contains("Model: command-a"));

    let models = h.service.handle_command(&user, "!models mlvoca").await.expect("models");
    assert!(models.starts_with("Models for mlvoca:"));
    let missing = h.service.handle_command(&user, "!models nope").await.expect("reply");
    assert_eq!(missing, "Unknown provider 'nope'. Try !providers.");
}

#[tokio::test]
async fn clear_forgets_history() {
    let h = harness(
        RoutedTransport::default().with_route("pollinations.ai", completion("ok")),
        &[],
        ChatPolicy::default(),
    );
    let user = UserId::new("c");
    h.service.handle_turn(&user, "remember me").await;

    let reply = h.service.handle_command(&user, "!clear").await.expect("reply");
    assert_eq!(reply, "Conversation cleared (2 messages).");
    assert_eq!(h.store.count_messages(&user).await.expect("count"), 0);
}

#[tokio::test]
async fn search_command_without_results() {
    let h = harness(RoutedTransport::default(), &[], ChatPolicy::default());
    let user = UserId::new("s");

    let reply = h.service.handle_command(&user, "!search rust").await.expect("reply");
    assert_eq!(reply, "No search results for 'rust'.");
    let usage = h.service.handle_command(&user, "!search").await.expect("reply");
    assert_eq!(usage, "Usage: !search <query>");
}

#[tokio::test]
async fn pinned_chain_member_is_tried_once_per_turn() {
    let h = harness(
        RoutedTransport::default()
            .with_route("api.groq.com", Err(ProviderError::transport("overloaded").with_status(503)))
            .with_route("openrouter.ai", completion("hi there")),
        &[("groq", "gsk"), ("openrouter", "sk-or")],
        ChatPolicy::default(),
    );
    let user = UserId::new("pin");
    h.service
        .handle_command(&user, "!provider groq llama-3.1-8b-instant")
        .await
        .expect("pinned");

    let outcome = h
        .service
        .run_turn(TurnRequest::new(user.clone(), "hello"))
        .await
        .expect("openrouter answers");

    assert_eq!(
        outcome.fallback_from,
        Some(Candidate::new(ProviderId::Groq, "llama-3.1-8b-instant"))
    );
    let models = h.transport.models_called();
    assert_eq!(
        models,
        vec![
            "llama-3.1-8b-instant",
            "llama-3.3-70b-versatile",
            "meta-llama/llama-4-scout:free"
        ]
    );
}

#[tokio::test]
async fn unconfigured_pin_is_skipped_and_the_chain_answers() {
    let h = harness(
        RoutedTransport::default().with_route("pollinations.ai", completion("from the chain")),
        &[],
        ChatPolicy::default(),
    );
    let user = UserId::new("nokey");

    let pinned = h
        .service
        .handle_command(&user, "!provider cohere")
        .await
        .expect("reply");
    assert!(pinned.starts_with("Now using cohere/command-a."));
    assert!(pinned.contains("not configured"));

    let outcome = h
        .service
        .run_turn(TurnRequest::new(user.clone(), "hello"))
        .await
        .expect("pollinations answers");

    assert_eq!(outcome.text, "from the chain");
    assert_eq!(outcome.answered_by.provider, ProviderId::Pollinations);
    assert_eq!(
        outcome.fallback_from,
        Some(Candidate::new(ProviderId::Cohere, "command-a"))
    );
    assert!(h.transport.requests().iter().all(|request| !request.url.contains("cohere")));
}

#[derive(Default)]
struct UnreadableSettings {
    inner: InMemoryConversationStore,
    read_failures: AtomicUsize,
}

impl ConversationStore for UnreadableSettings {
    fn read_settings<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<Option<UserSettings>, ChatError>> {
        let failing = self
            .read_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Box::pin(async {
                Err::<Option<UserSettings>, _>(ChatError::store("no such column: provider"))
            });
        }
        self.inner.read_settings(user)
    }

    fn write_settings<'a>(
        &'a self,
        user: &'a UserId,
        settings: &'a UserSettings,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        self.inner.write_settings(user, settings)
    }

    fn append_message<'a>(
        &'a self,
        user: &'a UserId,
        message: Message,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        self.inner.append_message(user, message)
    }

    fn read_history<'a>(
        &'a self,
        user: &'a UserId,
        limit: usize,
    ) -> ChatFuture<'a, Result<Vec<Message>, ChatError>> {
        self.inner.read_history(user, limit)
    }

    fn clear_history<'a>(&'a self, user: &'a UserId) -> ChatFuture<'a, Result<usize, ChatError>> {
        self.inner.clear_history(user)
    }

    fn count_messages<'a>(
        &'a self,
        user: &'a UserId,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        self.inner.count_messages(user)
    }

    fn trim_history<'a>(
        &'a self,
        user: &'a UserId,
        keep: usize,
    ) -> ChatFuture<'a, Result<usize, ChatError>> {
        self.inner.trim_history(user, keep)
    }
}

#[tokio::test]
async fn unreadable_settings_answer_with_defaults_and_keep_the_saved_row() {
    let user = UserId::new("flaky");
    let saved = UserSettings::new(ProviderId::Cohere, "command-a", Mode::Reasoning);
    let store = Arc::new(UnreadableSettings {
        read_failures: AtomicUsize::new(2),
        ..UnreadableSettings::default()
    });
    store.inner.write_settings(&user, &saved).await.expect("seed");

    let transport = Arc::new(
        RoutedTransport::default()
            .with_route("pollinations.ai", completion("still answering"))
            .with_route("api.cohere.ai", Ok(json!({"message": {"content": [{"text": "cohere"}]}}))),
    );
    let credentials = CredentialStore::new();
    credentials.set_secret("cohere", "co").expect("secret should store");
    let resolver = CredentialResolver::new(
        Arc::new(ProviderCatalog::builtin()),
        Arc::new(credentials),
    );
    let dispatcher = Dispatcher::new(resolver, AdapterRegistry::with_transport(transport.clone()));
    let service = ChatService::builder(dispatcher, store.clone()).build();

    assert_eq!(service.handle_turn(&user, "hello").await, "still answering");

    let refused = service
        .handle_command(&user, "!mode search")
        .await
        .expect("reply");
    assert!(refused.starts_with("Could not save settings"), "reply was: {refused}");
    assert_eq!(
        store.inner.read_settings(&user).await.expect("read"),
        Some(saved)
    );

    assert_eq!(service.handle_turn(&user, "hello again").await, "cohere");
}
