//! Per-mode fallback chains and override planning.
//!
//! ```rust
//! use rprovider::{FallbackChains, Mode};
//!
//! let chains = FallbackChains::default();
//! assert_eq!(chains.chain_for("reasoning"), chains.chain(Mode::Reasoning));
//! assert_eq!(chains.chain_for("creative"), chains.chain_for("normal"));
//! ```

use crate::{Candidate, CredentialResolver, Mode, ProviderId};

const NORMAL_CHAIN: &[(ProviderId, &str)] = &[
    (ProviderId::Groq, "llama-3.3-70b-versatile"),
    (ProviderId::Groq, "llama-3.1-8b-instant"),
    (ProviderId::OpenRouter, "meta-llama/llama-4-scout:free"),
    (ProviderId::OpenRouter, "deepseek/deepseek-chat-v3-0324:free"),
    (ProviderId::Pollinations, "openai"),
    (ProviderId::Pollinations, "gemini"),
    (ProviderId::Cerebras, "llama3.1-8b"),
    (ProviderId::Cloudflare, "@cf/meta/llama-3.1-8b-instruct"),
    (ProviderId::Puter, "gpt-4o-mini"),
];

const REASONING_CHAIN: &[(ProviderId, &str)] = &[
    (ProviderId::Groq, "deepseek-r1-distill-llama-70b"),
    (ProviderId::Groq, "qwen/qwen3-32b"),
    (ProviderId::Groq, "openai/gpt-oss-120b"),
    (ProviderId::OpenRouter, "deepseek/deepseek-r1:free"),
    (ProviderId::OpenRouter, "deepseek/deepseek-r1-0528:free"),
    (ProviderId::OpenRouter, "stepfun/step-3.5-flash:free"),
    (ProviderId::Pollinations, "perplexity-reasoning"),
    (ProviderId::Cerebras, "gpt-oss-120b"),
    (ProviderId::Routeway, "deepseek-r1:free"),
];

const SEARCH_CHAIN: &[(ProviderId, &str)] = &[
    (ProviderId::Groq, "groq/compound"),
    (ProviderId::Groq, "groq/compound-mini"),
    (ProviderId::Pollinations, "gemini-search"),
    (ProviderId::Pollinations, "perplexity-fast"),
    (ProviderId::Cohere, "command-r-plus-08-2024"),
    (ProviderId::Puter, "perplexity/sonar"),
    (ProviderId::Pollinations, "openai"),
];

fn to_candidates(entries: &[(ProviderId, &str)]) -> Vec<Candidate> {
    entries
        .iter()
        .map(|(provider, model)| Candidate::new(*provider, *model))
        .collect()
}

/// What to try for one turn: an optional pinned candidate, then the mode's chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainPlan {
    pub pinned: Option<Candidate>,
    pub chain: Vec<Candidate>,
}

impl ChainPlan {
    pub fn new(chain: Vec<Candidate>) -> Self {
        Self { pinned: None, chain }
    }

    /// Chain entries equal to the pin are dropped, so it is called once.
    pub fn with_pin(mut self, pinned: Candidate) -> Self {
        self.chain.retain(|candidate| *candidate != pinned);
        self.pinned = Some(pinned);
        self
    }

    /// The pin first, then the chain, in the order they will be tried.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.pinned.iter().chain(self.chain.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChains {
    normal: Vec<Candidate>,
    reasoning: Vec<Candidate>,
    search: Vec<Candidate>,
}

impl Default for FallbackChains {
    fn default() -> Self {
        Self {
            normal: to_candidates(NORMAL_CHAIN),
            reasoning: to_candidates(REASONING_CHAIN),
            search: to_candidates(SEARCH_CHAIN),
        }
    }
}

impl FallbackChains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, mode: Mode, chain: Vec<Candidate>) -> Self {
        match mode {
            Mode::Normal => self.normal = chain,
            Mode::Reasoning => self.reasoning = chain,
            Mode::Search => self.search = chain,
        }
        self
    }

    pub fn chain(&self, mode: Mode) -> &[Candidate] {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Reasoning => &self.reasoning,
            Mode::Search => &self.search,
        }
    }

    /// Unrecognized mode names fall back to the normal chain.
    pub fn chain_for(&self, mode: &str) -> &[Candidate] {
        self.chain(Mode::parse(mode).unwrap_or_default())
    }

    /// The override is pinned only when its provider is currently available.
    pub fn plan(
        &self,
        mode: &str,
        override_candidate: Option<&Candidate>,
        resolver: &CredentialResolver,
    ) -> ChainPlan {
        let plan = ChainPlan::new(self.chain_for(mode).to_vec());
        match override_candidate {
            Some(candidate) if resolver.is_available(candidate.provider) => {
                plan.with_pin(candidate.clone())
            }
            Some(candidate) => {
                tracing::debug!(
                    phase = "chain",
                    event = "override_unavailable",
                    provider = %candidate.provider,
                    model = candidate.model.as_str()
                );
                plan
            }
            None => plan,
        }
    }
}
