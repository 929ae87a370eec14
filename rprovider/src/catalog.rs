//! Static provider catalog and credential-based availability.
//!
//! Every provider the broker can reach is described once here: where to send
//! requests, which wire format it speaks, which secrets it needs and how they
//! are presented, and which models it serves.
//!
//! ```rust
//! use rprovider::{CredentialStore, ProviderCatalog, ProviderId};
//!
//! let catalog = ProviderCatalog::builtin();
//! let store = CredentialStore::new();
//!
//! let available = catalog.available_providers(&store);
//! assert!(available.contains(&ProviderId::Pollinations));
//! assert!(available.contains(&ProviderId::Mlvoca));
//! assert!(!available.contains(&ProviderId::Groq));
//!
//! let models = catalog.models_for("groq").expect("groq is catalogued");
//! assert_eq!(models[0], "groq/compound");
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use rcommon::Registry;

use crate::{CredentialStore, Mode, ProviderError, ProviderId, WireFormat, parse_provider_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub modes: &'static [Mode],
}

impl ModelSpec {
    pub const fn new(id: &'static str, name: &'static str, modes: &'static [Mode]) -> Self {
        Self { id, name, modes }
    }

    pub fn supports(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }
}

/// Request URL shape. `PerModel` templates substitute `{model}` and any
/// `{secret_name}` placeholder with the resolved secret value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Static(&'static str),
    PerModel(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRequirement {
    None,
    Required(&'static [&'static str]),
}

impl CredentialRequirement {
    pub fn secrets(&self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Required(names) => names,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    None,
    Bearer(&'static str),
    /// Sends a bearer token only when the secret is configured.
    OptionalBearer(&'static str),
    Header {
        name: &'static str,
        secret: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyClass {
    Fast,
    Standard,
    Slow,
}

impl LatencyClass {
    pub fn timeout(self) -> Duration {
        match self {
            Self::Fast => Duration::from_secs(30),
            Self::Standard => Duration::from_secs(60),
            Self::Slow => Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub endpoint: Endpoint,
    pub wire_format: WireFormat,
    pub credential: CredentialRequirement,
    pub auth: AuthScheme,
    pub extra_headers: &'static [(&'static str, &'static str)],
    pub latency: LatencyClass,
    pub models: &'static [ModelSpec],
    pub default_model: &'static str,
}

impl ProviderDescriptor {
    pub fn is_available(&self, store: &CredentialStore) -> bool {
        self.credential
            .secrets()
            .iter()
            .all(|name| store.has_secret(name))
    }

    pub fn model_ids(&self) -> Vec<&'static str> {
        self.models.iter().map(|model| model.id).collect()
    }

    pub fn has_model(&self, model: &str) -> bool {
        self.models.iter().any(|spec| spec.id == model)
    }

    pub fn timeout(&self) -> Duration {
        self.latency.timeout()
    }

    pub fn endpoint_url(&self, model: &str, store: &CredentialStore) -> Result<String, ProviderError> {
        match self.endpoint {
            Endpoint::Static(url) => Ok(url.to_string()),
            Endpoint::PerModel(template) => {
                let mut url = template.replace("{model}", model);
                for name in self.credential.secrets() {
                    let placeholder = format!("{{{name}}}");
                    if url.contains(&placeholder) {
                        url = url.replace(&placeholder, &store.require(name)?);
                    }
                }
                Ok(url)
            }
        }
    }

    /// Auth header plus the provider's static extra headers.
    pub fn headers(&self, store: &CredentialStore) -> Result<Vec<(String, String)>, ProviderError> {
        let mut headers = Vec::with_capacity(self.extra_headers.len() + 1);
        match self.auth {
            AuthScheme::None => {}
            AuthScheme::Bearer(secret) => {
                headers.push(("Authorization".to_string(), bearer(&store.require(secret)?)));
            }
            AuthScheme::OptionalBearer(secret) => {
                if let Some(value) = store.with_secret(secret, bearer) {
                    headers.push(("Authorization".to_string(), value));
                }
            }
            AuthScheme::Header { name, secret } => {
                headers.push((name.to_string(), store.require(secret)?));
            }
        }

        headers.extend(
            self.extra_headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        Ok(headers)
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    descriptors: Registry<ProviderId, ProviderDescriptor>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for descriptor in builtin_descriptors() {
            catalog.register(descriptor);
        }
        catalog
    }

    pub fn register(&mut self, descriptor: ProviderDescriptor) -> Option<ProviderDescriptor> {
        self.descriptors.insert(descriptor.id, descriptor)
    }

    pub fn get(&self, id: ProviderId) -> Option<&ProviderDescriptor> {
        self.descriptors.get(id)
    }

    pub fn lookup(&self, name: &str) -> Result<&ProviderDescriptor, ProviderError> {
        let id = parse_provider_id(name)?;
        self.get(id)
            .ok_or_else(|| ProviderError::unknown_provider(name.trim()))
    }

    /// Descriptors in declaration order of [`ProviderId::ALL`].
    pub fn descriptors(&self) -> Vec<&ProviderDescriptor> {
        self.descriptors.values().collect()
    }

    pub fn models_for(&self, name: &str) -> Result<Vec<&'static str>, ProviderError> {
        Ok(self.lookup(name)?.model_ids())
    }

    pub fn is_available(&self, id: ProviderId, store: &CredentialStore) -> bool {
        self.get(id)
            .is_some_and(|descriptor| descriptor.is_available(store))
    }

    pub fn available_providers(&self, store: &CredentialStore) -> BTreeSet<ProviderId> {
        self.descriptors()
            .into_iter()
            .filter(|descriptor| descriptor.is_available(store))
            .map(|descriptor| descriptor.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Catalog paired with the live secret store.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    catalog: Arc<ProviderCatalog>,
    store: Arc<CredentialStore>,
}

impl CredentialResolver {
    pub fn new(catalog: Arc<ProviderCatalog>, store: Arc<CredentialStore>) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn is_available(&self, id: ProviderId) -> bool {
        self.catalog.is_available(id, &self.store)
    }

    pub fn available_providers(&self) -> BTreeSet<ProviderId> {
        self.catalog.available_providers(&self.store)
    }

    pub fn models_for(&self, name: &str) -> Result<Vec<&'static str>, ProviderError> {
        self.catalog.models_for(name)
    }
}

const NORMAL: &[Mode] = &[Mode::Normal];
const REASONING: &[Mode] = &[Mode::Reasoning];
const SEARCH: &[Mode] = &[Mode::Search];
const NORMAL_REASONING: &[Mode] = &[Mode::Normal, Mode::Reasoning];
const NORMAL_SEARCH: &[Mode] = &[Mode::Normal, Mode::Search];
const REASONING_SEARCH: &[Mode] = &[Mode::Reasoning, Mode::Search];

const GROQ_MODELS: &[ModelSpec] = &[
    ModelSpec::new("groq/compound", "Groq Compound (Web Search)", NORMAL_SEARCH),
    ModelSpec::new("groq/compound-mini", "Groq Compound Mini", NORMAL_SEARCH),
    ModelSpec::new("compound-beta", "Groq Compound Beta", NORMAL_SEARCH),
    ModelSpec::new("compound-beta-mini", "Groq Compound Beta Mini", NORMAL_SEARCH),
    ModelSpec::new("llama-3.3-70b-versatile", "Llama 3.3 70B", NORMAL),
    ModelSpec::new("llama-3.1-8b-instant", "Llama 3.1 8B", NORMAL),
    ModelSpec::new("openai/gpt-oss-120b", "GPT-OSS 120B", NORMAL_REASONING),
    ModelSpec::new("openai/gpt-oss-20b", "GPT-OSS 20B", NORMAL),
    ModelSpec::new(
        "meta-llama/llama-4-maverick-17b-128e-instruct",
        "Llama 4 Maverick",
        REASONING,
    ),
    ModelSpec::new(
        "meta-llama/llama-4-scout-17b-16e-instruct",
        "Llama 4 Scout",
        REASONING,
    ),
    ModelSpec::new("qwen/qwen3-32b", "Qwen 3 32B", NORMAL_REASONING),
    ModelSpec::new("deepseek-r1-distill-llama-70b", "DeepSeek R1 Distill", REASONING),
    ModelSpec::new("moonshotai/kimi-k2-instruct-0905", "Kimi K2", NORMAL),
];

const OPENROUTER_MODELS: &[ModelSpec] = &[
    ModelSpec::new("openrouter/free", "Auto (Free)", NORMAL),
    ModelSpec::new("deepseek/deepseek-r1:free", "DeepSeek R1", REASONING),
    ModelSpec::new("deepseek/deepseek-r1-0528:free", "DeepSeek R1 0528", REASONING),
    ModelSpec::new("deepseek/deepseek-r1-zero:free", "DeepSeek R1 Zero", REASONING),
    ModelSpec::new("qwen/qwen3-coder:free", "Qwen3 Coder", NORMAL_REASONING),
    ModelSpec::new("stepfun/step-3.5-flash:free", "Step 3.5 Flash", REASONING),
    ModelSpec::new(
        "google/gemini-2.5-pro-exp-03-25:free",
        "Gemini 2.5 Pro Exp",
        REASONING,
    ),
    ModelSpec::new(
        "moonshotai/kimi-vl-a3b-thinking:free",
        "Kimi VL Thinking",
        REASONING,
    ),
    ModelSpec::new("meta-llama/llama-4-maverick:free", "Llama 4 Maverick", NORMAL_REASONING),
    ModelSpec::new("meta-llama/llama-4-scout:free", "Llama 4 Scout", NORMAL_REASONING),
    ModelSpec::new("deepseek/deepseek-v3-base:free", "DeepSeek V3", NORMAL),
    ModelSpec::new("deepseek/deepseek-chat-v3-0324:free", "DeepSeek Chat V3", NORMAL),
    ModelSpec::new(
        "mistralai/mistral-small-3.1-24b-instruct:free",
        "Mistral Small 3.1",
        NORMAL,
    ),
    ModelSpec::new(
        "nvidia/llama-3.1-nemotron-nano-8b-v1:free",
        "Nemotron Nano 8B",
        NORMAL,
    ),
    ModelSpec::new("qwen/qwen2.5-vl-3b-instruct:free", "Qwen 2.5 VL 3B", NORMAL),
    ModelSpec::new(
        "qwen/qwen3-next-80b-a3b-instruct:free",
        "Qwen3 Next 80B",
        NORMAL,
    ),
    ModelSpec::new("nvidia/nemotron-3-nano-30b-a3b:free", "Nemotron 3 Nano 30B", NORMAL),
    ModelSpec::new("arcee-ai/trinity-large-preview:free", "Trinity Large", NORMAL),
    ModelSpec::new("zhipuai/glm-4.5-air:free", "GLM 4.5 Air", NORMAL_REASONING),
];

const POLLINATIONS_MODELS: &[ModelSpec] = &[
    ModelSpec::new("openai", "OpenAI", NORMAL),
    ModelSpec::new("openai-fast", "OpenAI Fast", NORMAL),
    ModelSpec::new("openai-large", "OpenAI Large", NORMAL),
    ModelSpec::new("gemini", "Gemini", NORMAL),
    ModelSpec::new("gemini-fast", "Gemini Fast", NORMAL),
    ModelSpec::new("gemini-large", "Gemini Large", NORMAL),
    ModelSpec::new("gemini-search", "Gemini Search", SEARCH),
    ModelSpec::new("deepseek", "DeepSeek V3.2", NORMAL),
    ModelSpec::new("claude", "Claude", NORMAL),
    ModelSpec::new("claude-fast", "Claude Fast", NORMAL),
    ModelSpec::new("claude-large", "Claude Large", NORMAL),
    ModelSpec::new("mistral", "Mistral", NORMAL),
    ModelSpec::new("grok", "Grok", NORMAL),
    ModelSpec::new("qwen-coder", "Qwen3 Coder", NORMAL),
    ModelSpec::new("kimi", "Kimi K2.5", NORMAL),
    ModelSpec::new("glm", "GLM", NORMAL),
    ModelSpec::new("minimax", "MiniMax", NORMAL),
    ModelSpec::new("perplexity-fast", "Perplexity Fast", SEARCH),
    ModelSpec::new("perplexity-reasoning", "Perplexity Reasoning", REASONING_SEARCH),
];

const GEMINI_MODELS: &[ModelSpec] = &[
    ModelSpec::new("gemini-2.5-pro", "Gemini 2.5 Pro", NORMAL_REASONING),
    ModelSpec::new("gemini-2.5-flash", "Gemini 2.5 Flash", NORMAL_REASONING),
    ModelSpec::new("gemini-2.5-flash-lite", "Gemini 2.5 Flash Lite", NORMAL),
    ModelSpec::new("gemini-3-flash-preview", "Gemini 3 Flash", NORMAL_REASONING),
    ModelSpec::new("gemma-3-27b-it", "Gemma 3 27B", NORMAL),
    ModelSpec::new("gemma-2-9b-it", "Gemma 2 9B", NORMAL),
];

const CEREBRAS_MODELS: &[ModelSpec] = &[
    ModelSpec::new("llama3.1-8b", "Llama 3.1 8B", NORMAL),
    ModelSpec::new("gpt-oss-120b", "GPT-OSS 120B", NORMAL_REASONING),
    ModelSpec::new("glm-4.7", "GLM 4.7", NORMAL_REASONING),
];

const CLOUDFLARE_MODELS: &[ModelSpec] = &[
    ModelSpec::new(
        "@cf/meta/llama-4-scout-17b-16e-instruct",
        "Llama 4 Scout",
        NORMAL_REASONING,
    ),
    ModelSpec::new(
        "@cf/meta/llama-3.3-70b-instruct-fp8-fast",
        "Llama 3.3 70B",
        NORMAL,
    ),
    ModelSpec::new("@cf/meta/llama-3.1-8b-instruct", "Llama 3.1 8B", NORMAL),
    ModelSpec::new(
        "@cf/mistralai/mistral-small-3.1-24b-instruct",
        "Mistral Small 3.1",
        NORMAL,
    ),
    ModelSpec::new("@cf/google/gemma-3-12b-it", "Gemma 3 12B", NORMAL),
    ModelSpec::new("@cf/openai/gpt-oss-120b", "GPT-OSS 120B", NORMAL_REASONING),
    ModelSpec::new("@cf/openai/gpt-oss-20b", "GPT-OSS 20B", NORMAL),
];

const HUGGINGFACE_MODELS: &[ModelSpec] = &[
    ModelSpec::new("deepseek-ai/DeepSeek-R1", "DeepSeek R1", REASONING),
    ModelSpec::new("deepseek-ai/DeepSeek-R1-0528", "DeepSeek R1 0528", REASONING),
    ModelSpec::new(
        "deepseek-ai/DeepSeek-R1-Distill-Qwen-7B",
        "DeepSeek R1 Distill 7B",
        REASONING,
    ),
    ModelSpec::new(
        "deepseek-ai/DeepSeek-R1-Distill-Llama-70B",
        "DeepSeek R1 Distill 70B",
        REASONING,
    ),
    ModelSpec::new("meta-llama/Meta-Llama-3.1-8B-Instruct", "Llama 3.1 8B", NORMAL),
    ModelSpec::new("mistralai/Mistral-7B-Instruct-v0.3", "Mistral 7B", NORMAL),
    ModelSpec::new("HuggingFaceH4/zephyr-7b-beta", "Zephyr 7B", NORMAL),
];

const COHERE_MODELS: &[ModelSpec] = &[
    ModelSpec::new("command-a", "Command A", NORMAL),
    ModelSpec::new("command-r-plus-08-2024", "Command R+", NORMAL_SEARCH),
    ModelSpec::new("command-r-08-2024", "Command R", NORMAL),
    ModelSpec::new("command-r7b-12-2024", "Command R 7B", NORMAL),
];

const SILICONFLOW_MODELS: &[ModelSpec] = &[
    ModelSpec::new("Qwen/Qwen2.5-7B-Instruct", "Qwen 2.5 7B", NORMAL),
    ModelSpec::new("Qwen/Qwen2.5-Coder-7B-Instruct", "Qwen 2.5 Coder 7B", NORMAL),
    ModelSpec::new("THUDM/glm-4-9b-chat", "GLM 4 9B", NORMAL),
];

const ROUTEWAY_MODELS: &[ModelSpec] = &[
    ModelSpec::new("glm-4.6:free", "GLM 4.6", NORMAL_REASONING),
    ModelSpec::new("glm-4.5-air:free", "GLM 4.5 Air", NORMAL),
    ModelSpec::new("deepseek-r1:free", "DeepSeek R1", REASONING),
    ModelSpec::new("kimi-k2:free", "Kimi K2", NORMAL),
    ModelSpec::new("minimax:free", "MiniMax", NORMAL),
];

const MLVOCA_MODELS: &[ModelSpec] = &[
    ModelSpec::new("tinyllama", "TinyLlama", NORMAL),
    ModelSpec::new("deepseek-r1:1.5b", "DeepSeek R1 1.5B", REASONING),
];

const PUTER_MODELS: &[ModelSpec] = &[
    ModelSpec::new("gpt-4o", "GPT-4o", NORMAL),
    ModelSpec::new("gpt-4o-mini", "GPT-4o Mini", NORMAL),
    ModelSpec::new("gpt-4.1-nano", "GPT-4.1 Nano", NORMAL),
    ModelSpec::new("claude-sonnet-4", "Claude Sonnet 4", NORMAL_REASONING),
    ModelSpec::new("claude-3-5-sonnet", "Claude 3.5 Sonnet", NORMAL_REASONING),
    ModelSpec::new("google/gemini-2.5-flash", "Gemini 2.5 Flash", NORMAL_REASONING),
    ModelSpec::new("google/gemini-2.5-pro", "Gemini 2.5 Pro", NORMAL_REASONING),
    ModelSpec::new("deepseek/deepseek-r1", "DeepSeek R1", REASONING),
    ModelSpec::new("deepseek/deepseek-chat", "DeepSeek Chat", NORMAL),
    ModelSpec::new("x-ai/grok-3", "Grok 3", NORMAL_REASONING),
    ModelSpec::new("x-ai/grok-3-mini", "Grok 3 Mini", NORMAL),
    ModelSpec::new("meta-llama/llama-3.3-70b-instruct", "Llama 3.3 70B", NORMAL),
    ModelSpec::new("perplexity/sonar", "Perplexity Sonar", SEARCH),
    ModelSpec::new("perplexity/sonar-pro", "Perplexity Sonar Pro", SEARCH),
];

const OPENROUTER_HEADERS: &[(&str, &str)] = &[
    ("HTTP-Referer", "https://relaybot.local"),
    ("X-Title", "relaybot"),
];

const COHERE_HEADERS: &[(&str, &str)] = &[("X-Client-Name", "relaybot")];

fn openai_compatible(
    id: ProviderId,
    display_name: &'static str,
    url: &'static str,
    secret: &'static [&'static str],
    latency: LatencyClass,
    models: &'static [ModelSpec],
    default_model: &'static str,
) -> ProviderDescriptor {
    ProviderDescriptor {
        id,
        display_name,
        endpoint: Endpoint::Static(url),
        wire_format: WireFormat::GenericCompletion,
        credential: CredentialRequirement::Required(secret),
        auth: AuthScheme::Bearer(secret[0]),
        extra_headers: &[],
        latency,
        models,
        default_model,
    }
}

fn builtin_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        openai_compatible(
            ProviderId::Groq,
            "Groq",
            "https://api.groq.com/openai/v1/chat/completions",
            &["groq"],
            LatencyClass::Fast,
            GROQ_MODELS,
            "llama-3.3-70b-versatile",
        ),
        ProviderDescriptor {
            extra_headers: OPENROUTER_HEADERS,
            ..openai_compatible(
                ProviderId::OpenRouter,
                "OpenRouter",
                "https://openrouter.ai/api/v1/chat/completions",
                &["openrouter"],
                LatencyClass::Standard,
                OPENROUTER_MODELS,
                "meta-llama/llama-4-scout:free",
            )
        },
        ProviderDescriptor {
            id: ProviderId::Pollinations,
            display_name: "Pollinations",
            endpoint: Endpoint::Static("https://gen.pollinations.ai/v1/chat/completions"),
            wire_format: WireFormat::GenericCompletion,
            credential: CredentialRequirement::None,
            auth: AuthScheme::OptionalBearer("pollinations"),
            extra_headers: &[],
            latency: LatencyClass::Standard,
            models: POLLINATIONS_MODELS,
            default_model: "openai",
        },
        ProviderDescriptor {
            id: ProviderId::Gemini,
            display_name: "Google Gemini",
            endpoint: Endpoint::PerModel(
                "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent",
            ),
            wire_format: WireFormat::ContentGeneration,
            credential: CredentialRequirement::Required(&["gemini"]),
            auth: AuthScheme::Header {
                name: "x-goog-api-key",
                secret: "gemini",
            },
            extra_headers: &[],
            latency: LatencyClass::Standard,
            models: GEMINI_MODELS,
            default_model: "gemini-2.5-flash",
        },
        openai_compatible(
            ProviderId::Cerebras,
            "Cerebras",
            "https://api.cerebras.ai/v1/chat/completions",
            &["cerebras"],
            LatencyClass::Fast,
            CEREBRAS_MODELS,
            "llama3.1-8b",
        ),
        ProviderDescriptor {
            id: ProviderId::Cloudflare,
            display_name: "Cloudflare Workers AI",
            endpoint: Endpoint::PerModel(
                "https://api.cloudflare.com/client/v4/accounts/{cloudflare_account}/ai/run/{model}",
            ),
            wire_format: WireFormat::MessageArray,
            credential: CredentialRequirement::Required(&["cloudflare", "cloudflare_account"]),
            auth: AuthScheme::Bearer("cloudflare"),
            extra_headers: &[],
            latency: LatencyClass::Standard,
            models: CLOUDFLARE_MODELS,
            default_model: "@cf/meta/llama-3.1-8b-instruct",
        },
        openai_compatible(
            ProviderId::HuggingFace,
            "HuggingFace",
            "https://router.huggingface.co/v1/chat/completions",
            &["huggingface"],
            LatencyClass::Slow,
            HUGGINGFACE_MODELS,
            "meta-llama/Meta-Llama-3.1-8B-Instruct",
        ),
        ProviderDescriptor {
            id: ProviderId::Cohere,
            display_name: "Cohere",
            endpoint: Endpoint::Static("https://api.cohere.ai/v2/chat"),
            wire_format: WireFormat::MessageArray,
            credential: CredentialRequirement::Required(&["cohere"]),
            auth: AuthScheme::Bearer("cohere"),
            extra_headers: COHERE_HEADERS,
            latency: LatencyClass::Standard,
            models: COHERE_MODELS,
            default_model: "command-a",
        },
        openai_compatible(
            ProviderId::SiliconFlow,
            "SiliconFlow",
            "https://api.siliconflow.cn/v1/chat/completions",
            &["siliconflow"],
            LatencyClass::Standard,
            SILICONFLOW_MODELS,
            "Qwen/Qwen2.5-7B-Instruct",
        ),
        openai_compatible(
            ProviderId::Routeway,
            "Routeway",
            "https://api.routeway.ai/v1/chat/completions",
            &["routeway"],
            LatencyClass::Standard,
            ROUTEWAY_MODELS,
            "glm-4.6:free",
        ),
        ProviderDescriptor {
            id: ProviderId::Mlvoca,
            display_name: "MLVOCA",
            endpoint: Endpoint::Static("https://mlvoca.com/api/generate"),
            wire_format: WireFormat::RawGenerate,
            credential: CredentialRequirement::None,
            auth: AuthScheme::None,
            extra_headers: &[],
            latency: LatencyClass::Slow,
            models: MLVOCA_MODELS,
            default_model: "tinyllama",
        },
        ProviderDescriptor {
            id: ProviderId::Puter,
            display_name: "Puter",
            endpoint: Endpoint::Static("https://api.puter.com/drivers/call"),
            wire_format: WireFormat::DriverCall,
            credential: CredentialRequirement::Required(&["puter"]),
            auth: AuthScheme::Bearer("puter"),
            extra_headers: &[],
            latency: LatencyClass::Slow,
            models: PUTER_MODELS,
            default_model: "gpt-4o-mini",
        },
    ]
}
