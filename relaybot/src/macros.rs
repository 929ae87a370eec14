/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use relaybot::{Role, relay_msg};
///
/// let message = relay_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! relay_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::System, $content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use relaybot::{Role, relay_messages};
///
/// let messages = relay_messages![
///     system => "You are concise.",
///     user => "What changed?",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! relay_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::relay_msg!($role => $content)),+]
    };
}

/// Creates a [`Candidate`](crate::Candidate) from a provider shorthand.
///
/// ```rust
/// use relaybot::{ProviderId, relay_candidate};
///
/// let candidate = relay_candidate!(workers_ai, "@cf/meta/llama-3.1-8b-instruct");
/// assert_eq!(candidate.provider, ProviderId::Cloudflare);
/// assert_eq!(relay_candidate!(groq, "compound").to_string(), "groq/compound");
/// ```
#[macro_export]
macro_rules! relay_candidate {
    (groq, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Groq, $model)
    };
    (openrouter, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::OpenRouter, $model)
    };
    (pollinations, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Pollinations, $model)
    };
    (gemini, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Gemini, $model)
    };
    (cerebras, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Cerebras, $model)
    };
    (cloudflare, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Cloudflare, $model)
    };
    (workers_ai, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Cloudflare, $model)
    };
    (huggingface, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::HuggingFace, $model)
    };
    (cohere, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Cohere, $model)
    };
    (siliconflow, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::SiliconFlow, $model)
    };
    (routeway, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Routeway, $model)
    };
    (mlvoca, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Mlvoca, $model)
    };
    (puter, $model:expr $(,)?) => {
        $crate::Candidate::new($crate::ProviderId::Puter, $model)
    };
    ($provider:ident, $model:expr $(,)?) => {
        compile_error!("unknown provider shorthand");
    };
}
