//! System prompts and reply cleanup.
//!
//! ```rust
//! use rchat::strip_think_tags;
//!
//! assert_eq!(strip_think_tags("<think>plan</think>\n\nAnswer"), "Answer");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use rprovider::{Message, Mode};

const NORMAL_PROMPT: &str = "You are a helpful AI assistant. \
Remember the conversation context. Respond in the user's language. Be concise.";

const REASONING_PROMPT: &str = "You are a reasoning AI. Think step by step. \
Do not use <think> tags. Explain naturally. Respond in the user's language.";

const SEARCH_PROMPT: &str = "You are an AI with web search results. \
Answer based on the search results and the conversation context. \
Cite URLs when relevant. Respond in the user's language.";

const REASONING_TAGS: [&str; 3] = ["think", "thinking", "thought"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompts {
    pub normal: String,
    pub reasoning: String,
    pub search: String,
}

impl Default for SystemPrompts {
    fn default() -> Self {
        Self {
            normal: NORMAL_PROMPT.to_string(),
            reasoning: REASONING_PROMPT.to_string(),
            search: SEARCH_PROMPT.to_string(),
        }
    }
}

impl SystemPrompts {
    pub fn for_mode(&self, mode: Mode) -> &str {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Reasoning => &self.reasoning,
            Mode::Search => &self.search,
        }
    }

    pub fn system_message(&self, mode: Mode) -> Message {
        Message::system(self.for_mode(mode))
    }
}

/// The single system message carrying flattened web results into a turn.
pub fn search_context_message(results: &str) -> Message {
    Message::system(format!("Web search results:\n{results}"))
}

struct TagPatterns {
    blocks: Vec<Regex>,
    stray: Vec<Regex>,
    blank_runs: Option<Regex>,
}

static TAG_PATTERNS: LazyLock<TagPatterns> = LazyLock::new(|| TagPatterns {
    blocks: REASONING_TAGS
        .iter()
        .filter_map(|tag| Regex::new(&format!(r"(?s)<{tag}>.*?</{tag}>")).ok())
        .collect(),
    stray: REASONING_TAGS
        .iter()
        .filter_map(|tag| Regex::new(&format!(r"</?{tag}>")).ok())
        .collect(),
    blank_runs: Regex::new(r"\n{3,}").ok(),
});

/// Removes reasoning blocks and stray reasoning tags, then tidies blank lines.
pub fn strip_think_tags(text: &str) -> String {
    let patterns = &*TAG_PATTERNS;
    let mut cleaned = text.to_string();
    for (block, stray) in patterns.blocks.iter().zip(&patterns.stray) {
        cleaned = block.replace_all(&cleaned, "").into_owned();
        cleaned = stray.replace_all(&cleaned, "").into_owned();
    }
    if let Some(blank_runs) = &patterns.blank_runs {
        cleaned = blank_runs.replace_all(&cleaned, "\n\n").into_owned();
    }
    cleaned.trim().to_string()
}
