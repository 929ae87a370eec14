//! Prefix commands understood by the chat service.
//!
//! ```rust
//! use rchat::{Command, parse_command};
//!
//! assert_eq!(parse_command("!", "!mode search"), Some(Command::Mode(Some("search".into()))));
//! assert_eq!(parse_command("!", "!dance"), None);
//! assert_eq!(parse_command("!", "hello"), None);
//! ```

use rprovider::{Mode, ProviderDescriptor, ProviderId};

use crate::UserSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Clear,
    Mode(Option<String>),
    Provider {
        name: Option<String>,
        model: Option<String>,
    },
    Providers,
    Models(Option<String>),
    Search(String),
}

/// Parses `text` when it starts with `prefix` and names a known command.
pub fn parse_command(prefix: &str, text: &str) -> Option<Command> {
    let body = text.trim().strip_prefix(prefix)?;
    let mut words = body.split_whitespace();
    let name = words.next()?.to_lowercase();
    let first = words.next().map(str::to_string);

    let command = match name.as_str() {
        "help" => Command::Help,
        "status" | "stats" => Command::Status,
        "clear" => Command::Clear,
        "mode" => Command::Mode(first),
        "provider" | "set" => Command::Provider {
            name: first,
            model: words.next().map(str::to_string),
        },
        "providers" => Command::Providers,
        "models" => Command::Models(first),
        "search" => {
            let query = body.trim_start()[name.len()..].trim();
            Command::Search(query.to_string())
        }
        _ => return None,
    };
    Some(command)
}

pub(crate) fn help_text(prefix: &str) -> String {
    [
        "Commands:".to_string(),
        format!("{prefix}help - show this list"),
        format!("{prefix}status - current provider, model, mode and history size"),
        format!("{prefix}clear - forget this conversation"),
        format!("{prefix}mode <normal|reasoning|search> - switch answer style"),
        format!("{prefix}provider <name> [model] - pin a provider (alias {prefix}set)"),
        format!("{prefix}providers - list providers and whether they are configured"),
        format!("{prefix}models <provider> - list a provider's models"),
        format!("{prefix}search <query> - run a web search"),
    ]
    .join("\n")
}

pub(crate) fn status_text(settings: &UserSettings, messages: usize, auto_detect: bool) -> String {
    format!(
        "Provider: {}\nModel: {}\nMode: {}\nMessages stored: {}\nAuto-detect: {}",
        settings.provider,
        settings.model,
        settings.mode,
        messages,
        if auto_detect { "on" } else { "off" },
    )
}

pub(crate) fn mode_usage() -> String {
    let modes = Mode::ALL.map(Mode::as_str).join(", ");
    format!("Available modes: {modes}")
}

pub(crate) fn providers_text(
    descriptors: &[&ProviderDescriptor],
    is_available: impl Fn(ProviderId) -> bool,
) -> String {
    let mut lines = vec!["Providers:".to_string()];
    lines.extend(descriptors.iter().map(|descriptor| {
        let state = if is_available(descriptor.id) {
            "ready"
        } else {
            "not configured"
        };
        format!(
            "{} ({}) - {state}, default {}",
            descriptor.id, descriptor.display_name, descriptor.default_model
        )
    }));
    lines.join("\n")
}

/// One line per model with the modes it is suited for.
pub(crate) fn models_text(descriptor: &ProviderDescriptor) -> String {
    let mut lines = vec![format!("Models for {}:", descriptor.id)];
    lines.extend(descriptor.models.iter().map(|model| {
        let modes = Mode::ALL
            .iter()
            .filter(|mode| model.supports(**mode))
            .map(|mode| mode.as_str())
            .collect::<Vec<_>>();
        format!("- {} ({})", model.id, modes.join(", "))
    }));
    lines.join("\n")
}
