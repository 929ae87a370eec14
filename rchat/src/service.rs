//! Turn orchestration: context assembly, search injection, dispatch, persistence.

use std::sync::Arc;

use rcommon::UserId;
use rprovider::{
    Candidate, Dispatcher, FallbackChains, Message, Mode, ProviderId, parse_provider_id,
};
use rsearch::SearchAggregator;

use crate::commands::{self, Command};
use crate::{
    ChatError, ConversationStore, InMemorySessionStore, ModeDetector, SessionStore,
    SettingsChange, SystemPrompts, UserSettings, parse_command, search_context_message,
    strip_think_tags,
};

/// The only failure text a user ever sees for a turn.
pub const APOLOGY: &str =
    "Sorry, all AI providers are unavailable right now. Please try again later.";
pub const NO_ANSWER_TEXT: &str = "No answer.";
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const EMPTY_INPUT_TEXT: &str = "Hello!";

/// Models that search the web themselves and need no injected results.
const GROUNDING_MODELS: &[(ProviderId, &str)] = &[
    (ProviderId::Pollinations, "gemini-search"),
    (ProviderId::Pollinations, "perplexity-fast"),
    (ProviderId::Pollinations, "perplexity-reasoning"),
];

fn is_grounding_model(candidate: &Candidate) -> bool {
    GROUNDING_MODELS
        .iter()
        .any(|(provider, model)| candidate.provider == *provider && candidate.model == *model)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPolicy {
    pub command_prefix: String,
    /// Messages sent as context and kept in the store per user.
    pub history_limit: usize,
    pub auto_detect: bool,
    pub prompts: SystemPrompts,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            auto_detect: false,
            prompts: SystemPrompts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub user: UserId,
    pub text: String,
    /// Inject web results even outside search mode.
    pub force_search: bool,
}

impl TurnRequest {
    pub fn new(user: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            text: text.into(),
            force_search: false,
        }
    }

    pub fn with_search(mut self) -> Self {
        self.force_search = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub text: String,
    pub mode: Mode,
    pub answered_by: Candidate,
    /// The user's pinned candidate when another one answered.
    pub fallback_from: Option<Candidate>,
    pub searched: bool,
    pub attempts: usize,
}

#[derive(Clone)]
pub struct ChatService {
    dispatcher: Dispatcher,
    chains: Arc<FallbackChains>,
    search: Option<Arc<SearchAggregator>>,
    store: Arc<dyn ConversationStore>,
    sessions: Arc<dyn SessionStore>,
    detector: Arc<ModeDetector>,
    policy: ChatPolicy,
}

pub struct ChatServiceBuilder {
    dispatcher: Dispatcher,
    store: Arc<dyn ConversationStore>,
    chains: FallbackChains,
    search: Option<Arc<SearchAggregator>>,
    sessions: Option<Arc<dyn SessionStore>>,
    defaults: UserSettings,
    detector: ModeDetector,
    policy: ChatPolicy,
}

impl ChatServiceBuilder {
    pub fn new(dispatcher: Dispatcher, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            dispatcher,
            store,
            chains: FallbackChains::default(),
            search: None,
            sessions: None,
            defaults: UserSettings::default(),
            detector: ModeDetector::default(),
            policy: ChatPolicy::default(),
        }
    }

    pub fn chains(mut self, chains: FallbackChains) -> Self {
        self.chains = chains;
        self
    }

    pub fn search(mut self, search: Arc<SearchAggregator>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Settings for users with nothing persisted; ignored when `sessions` is set.
    pub fn defaults(mut self, defaults: UserSettings) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn detector(mut self, detector: ModeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> ChatService {
        let sessions = self.sessions.unwrap_or_else(|| {
            Arc::new(InMemorySessionStore::new(self.store.clone(), self.defaults))
        });
        ChatService {
            dispatcher: self.dispatcher,
            chains: Arc::new(self.chains),
            search: self.search,
            store: self.store,
            sessions,
            detector: Arc::new(self.detector),
            policy: self.policy,
        }
    }
}

impl ChatService {
    pub fn builder(dispatcher: Dispatcher, store: Arc<dyn ConversationStore>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(dispatcher, store)
    }

    pub fn policy(&self) -> &ChatPolicy {
        &self.policy
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Answers a chat message; every failure collapses into [`APOLOGY`].
    pub async fn handle_turn(&self, user: &UserId, text: &str) -> String {
        match self.run_turn(TurnRequest::new(user.clone(), text)).await {
            Ok(outcome) => outcome.text,
            Err(error) => {
                tracing::warn!(
                    phase = "turn",
                    event = "apology",
                    user = %user,
                    error_kind = error.kind.as_str(),
                    error = %error,
                );
                APOLOGY.to_string()
            }
        }
    }

    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnOutcome, ChatError> {
        let TurnRequest {
            user,
            text,
            force_search,
        } = request;
        let text = match text.trim() {
            "" => EMPTY_INPUT_TEXT.to_string(),
            trimmed => trimmed.to_string(),
        };

        let settings = self.sessions.load(&user).await?;
        let history = match self.store.read_history(&user, self.policy.history_limit).await {
            Ok(history) => history,
            Err(error) => {
                tracing::warn!(
                    phase = "turn",
                    event = "history_read_failed",
                    user = %user,
                    error = %error,
                );
                Vec::new()
            }
        };

        let mode = self.effective_mode(settings.mode, &history, &text);
        let pinned = self.pinned_candidate(&settings);
        let mut messages = vec![self.policy.prompts.system_message(mode)];

        let wants_search = force_search || mode == Mode::Search;
        let grounded = pinned
            .as_ref()
            .is_some_and(|candidate| self.pinned_grounds_itself(candidate));
        let searched = if wants_search && !grounded {
            match self.search_context(&text).await {
                Some(results) => {
                    messages.push(search_context_message(&results));
                    true
                }
                None => false,
            }
        } else {
            false
        };

        messages.extend(history);
        messages.push(Message::user(text.clone()));

        let plan = self
            .chains
            .plan(mode.as_str(), pinned.as_ref(), self.dispatcher.resolver());
        let reply = self.dispatcher.run_plan(&plan, &messages).await?;

        let cleaned = match strip_think_tags(&reply.text) {
            cleaned if cleaned.is_empty() => NO_ANSWER_TEXT.to_string(),
            cleaned => cleaned,
        };
        self.persist(&user, Message::user(text)).await;
        self.persist(&user, Message::assistant(cleaned.clone())).await;
        self.prune(&user).await;

        tracing::info!(
            phase = "turn",
            event = "answered",
            user = %user,
            mode = mode.as_str(),
            provider = %reply.candidate.provider,
            model = reply.candidate.model.as_str(),
            searched,
            attempts = reply.attempts.len(),
        );

        let fallback_from = pinned.filter(|candidate| *candidate != reply.candidate);
        Ok(TurnOutcome {
            text: cleaned,
            mode,
            answered_by: reply.candidate,
            fallback_from,
            searched,
            attempts: reply.attempts.len(),
        })
    }

    /// Replies to `text` when it is a known command, otherwise `None`.
    pub async fn handle_command(&self, user: &UserId, text: &str) -> Option<String> {
        let command = parse_command(&self.policy.command_prefix, text)?;
        tracing::debug!(phase = "command", event = "received", user = %user, command = ?command);
        Some(self.execute(user, command).await)
    }

    async fn execute(&self, user: &UserId, command: Command) -> String {
        let prefix = self.policy.command_prefix.as_str();
        match command {
            Command::Help => commands::help_text(prefix),
            Command::Status => match self.sessions.load(user).await {
                Ok(settings) => {
                    let count = self.store.count_messages(user).await.unwrap_or_else(|error| {
                        tracing::warn!(phase = "command", event = "count_failed", error = %error);
                        0
                    });
                    commands::status_text(&settings, count, self.policy.auto_detect)
                }
                Err(error) => format!("Could not load settings: {}", error.message),
            },
            Command::Clear => match self.store.clear_history(user).await {
                Ok(removed) => format!("Conversation cleared ({removed} messages)."),
                Err(error) => format!("Could not clear the conversation: {}", error.message),
            },
            Command::Mode(None) => commands::mode_usage(),
            Command::Mode(Some(name)) => match Mode::parse(&name) {
                Ok(mode) => match self.sessions.update(user, SettingsChange::Mode(mode)).await {
                    Ok(_) => format!("Mode set to {mode}."),
                    Err(error) => format!("Could not save settings: {}", error.message),
                },
                Err(_) => format!("Unknown mode '{name}'. {}", commands::mode_usage()),
            },
            Command::Provider { name: None, .. } => {
                format!("Usage: {prefix}provider <name> [model]")
            }
            Command::Provider {
                name: Some(name),
                model,
            } => self.pin_provider(user, &name, model).await,
            Command::Providers => {
                let resolver = self.dispatcher.resolver();
                commands::providers_text(&resolver.catalog().descriptors(), |id| {
                    resolver.is_available(id)
                })
            }
            Command::Models(None) => format!("Usage: {prefix}models <provider>"),
            Command::Models(Some(name)) => match self.dispatcher.resolver().catalog().lookup(&name) {
                Ok(descriptor) => commands::models_text(descriptor),
                Err(_) => format!("Unknown provider '{name}'. Try {prefix}providers."),
            },
            Command::Search(query) if query.is_empty() => {
                format!("Usage: {prefix}search <query>")
            }
            Command::Search(query) => match &self.search {
                None => "Web search is not configured.".to_string(),
                Some(search) => match search.search(&query).await {
                    Some(results) => format!("Search results for '{query}':\n{results}"),
                    None => format!("No search results for '{query}'."),
                },
            },
        }
    }

    async fn pin_provider(&self, user: &UserId, name: &str, model: Option<String>) -> String {
        let prefix = self.policy.command_prefix.as_str();
        let resolver = self.dispatcher.resolver();
        let Some(descriptor) = parse_provider_id(name)
            .ok()
            .and_then(|id| resolver.catalog().get(id))
        else {
            return format!("Unknown provider '{name}'. Try {prefix}providers.");
        };

        let model = model.unwrap_or_else(|| descriptor.default_model.to_string());
        if !descriptor.has_model(&model) {
            return format!(
                "Unknown model '{model}' for {}. Try {prefix}models {}.",
                descriptor.id, descriptor.id
            );
        }

        let candidate = Candidate::new(descriptor.id, model);
        match self
            .sessions
            .update(user, SettingsChange::Candidate(candidate.clone()))
            .await
        {
            Ok(_) if resolver.is_available(descriptor.id) => format!("Now using {candidate}."),
            Ok(_) => format!(
                "Now using {candidate}. It is not configured, so replies will come from the fallback chain."
            ),
            Err(error) => format!("Could not save settings: {}", error.message),
        }
    }

    fn effective_mode(&self, mode: Mode, history: &[Message], text: &str) -> Mode {
        if !self.policy.auto_detect || !history.is_empty() {
            return mode;
        }
        match self.detector.detect(text) {
            Mode::Normal => mode,
            detected => {
                tracing::debug!(phase = "turn", event = "mode_detected", mode = detected.as_str());
                detected
            }
        }
    }

    /// The user's own choice; the process defaults never count as a pin.
    fn pinned_candidate(&self, settings: &UserSettings) -> Option<Candidate> {
        let candidate = settings.candidate();
        (candidate != self.sessions.defaults().candidate()).then_some(candidate)
    }

    fn pinned_grounds_itself(&self, pinned: &Candidate) -> bool {
        is_grounding_model(pinned) && self.dispatcher.resolver().is_available(pinned.provider)
    }

    async fn search_context(&self, query: &str) -> Option<String> {
        let search = self.search.as_ref()?;
        let results = search.search(query).await;
        if results.is_none() {
            tracing::debug!(phase = "turn", event = "search_empty");
        }
        results
    }

    async fn persist(&self, user: &UserId, message: Message) {
        let role = message.role;
        if let Err(error) = self.store.append_message(user, message).await {
            tracing::warn!(
                phase = "turn",
                event = "persist_failed",
                user = %user,
                role = role.as_str(),
                error = %error,
            );
        }
    }

    async fn prune(&self, user: &UserId) {
        match self.store.trim_history(user, self.policy.history_limit).await {
            Ok(0) => {}
            Ok(removed) => {
                tracing::debug!(phase = "turn", event = "history_trimmed", user = %user, removed);
            }
            Err(error) => {
                tracing::warn!(phase = "turn", event = "trim_failed", user = %user, error = %error);
            }
        }
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("dispatcher", &self.dispatcher)
            .field("search", &self.search.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
