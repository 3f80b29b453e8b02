use crate::grammar::{self, GrammarEntry, Verb};
use crate::suggest;
use crate::synthesizer;
use rand::RngCore;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

pub const MAX_COMMAND_LENGTH: usize = 500;
const ECHO_LENGTH: usize = 50;
const VERB_PREFIX: &str = "docker";

// Shell operators refused before any matching happens.
const DENYLIST: [&str; 8] = [";", "&&", "||", "|", "`", "$(", ">${", "<("];

/// Options recognised on a matched command. Unset switches and values are
/// left out when serialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    #[serde(skip_serializing_if = "is_false")]
    pub all: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub force: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub detach: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Flags {
    pub fn is_empty(&self) -> bool {
        *self == Flags::default()
    }

    /// Set flags as `(key, rendered value)` pairs, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        for (key, on) in [("all", self.all), ("force", self.force), ("detach", self.detach)] {
            if on {
                out.push((key, "true".to_string()));
            }
        }
        for (key, value) in [("port", &self.port), ("name", &self.name), ("tag", &self.tag)] {
            if let Some(v) = value {
                out.push((key, v.clone()));
            }
        }
        out
    }
}

/// Outcome of parsing one line of learner input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub action: Option<Verb>,
    pub target: String,
    pub valid: bool,
    pub success: bool,
    pub message: String,
    pub help_hint: Option<String>,
    pub metaphor_explanation: Option<String>,
    pub output: String,
    pub flags: Flags,
}

impl CommandResult {
    fn invalid(command: impl Into<String>, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            action: None,
            target: String::new(),
            valid: false,
            success: false,
            message: message.into(),
            help_hint: Some(hint.into()),
            metaphor_explanation: None,
            output: String::new(),
            flags: Flags::default(),
        }
    }

    /// Verb name, or an empty string when nothing was recognised.
    pub fn action_name(&self) -> &'static str {
        self.action.map(Verb::as_str).unwrap_or("")
    }
}

/// Parse with the thread-local RNG feeding the fabricated output.
pub fn parse_command(raw: &str) -> CommandResult {
    parse_command_with(raw, &mut rand::rng())
}

/// Parse raw bytes, as read from a terminal. Anything that is not UTF-8 is
/// rejected as unusable input.
pub fn parse_command_bytes(raw: &[u8]) -> CommandResult {
    match std::str::from_utf8(raw) {
        Ok(text) => parse_command(text),
        Err(_) => CommandResult::invalid(
            "",
            "❌ Invalid command input. Please enter a valid Docker command.",
            "Commands must be text strings starting with 'docker'",
        ),
    }
}

/// Parse `raw`, drawing random identifiers for the output from `rng`.
///
/// Total over every string: all failures come back as `valid == false`.
pub fn parse_command_with<R: RngCore + ?Sized>(raw: &str, rng: &mut R) -> CommandResult {
    let command = raw.trim();

    if let Some(rejected) = sanitize(command) {
        debug!(reason = %rejected.message, "rejected command input");
        return rejected;
    }

    for entry in grammar::grammar() {
        if let Some(caps) = entry.pattern.captures(command) {
            debug!(verb = %entry.verb, "matched grammar entry");
            return matched(command, entry, &caps, rng);
        }
    }

    unknown(command)
}

// Input gates, applied in order. Returns the rejection for the first gate
// that fails.
fn sanitize(command: &str) -> Option<CommandResult> {
    if command.is_empty() {
        return Some(CommandResult::invalid(
            command,
            "❌ No command entered. Try typing a Docker command!",
            "Start with: docker ps",
        ));
    }

    let length = command.chars().count();
    if length > MAX_COMMAND_LENGTH {
        let echoed: String = command.chars().take(ECHO_LENGTH).collect();
        return Some(CommandResult::invalid(
            format!("{}...", echoed),
            format!(
                "❌ Command too long ({} characters). Maximum allowed: {}",
                length, MAX_COMMAND_LENGTH
            ),
            "Docker commands should be concise. Check for errors or unnecessary repetition.",
        ));
    }

    if DENYLIST.iter().any(|p| command.contains(p)) {
        return Some(CommandResult::invalid(
            command,
            "❌ Invalid characters detected in command",
            "Docker commands should not contain shell operators like ;, &&, ||, or backticks. Use simple Docker command syntax.",
        ));
    }

    if command.chars().any(|c| (c as u32) < 32 && c != '\t' && c != '\n') {
        return Some(CommandResult::invalid(
            command,
            "❌ Invalid control characters in command",
            "Please use only printable characters in Docker commands.",
        ));
    }

    if !command.to_lowercase().starts_with(VERB_PREFIX) {
        return Some(CommandResult::invalid(
            command,
            "❌ Commands must start with 'docker'",
            format!("Did you mean: docker {}?", command),
        ));
    }

    None
}

fn matched<R: RngCore + ?Sized>(
    command: &str,
    entry: &GrammarEntry,
    caps: &Captures<'_>,
    rng: &mut R,
) -> CommandResult {
    let target = entry
        .operand
        .and_then(|group| caps.name(group))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let flags = caps
        .name("flags")
        .map(|m| parse_flags(m.as_str()))
        .unwrap_or_default();

    let message = success_message(entry.verb, &target, &flags);
    let output = synthesizer::synthesize_with(entry.verb, &target, &flags, rng);

    CommandResult {
        command: command.to_string(),
        action: Some(entry.verb),
        target,
        valid: true,
        success: true,
        message,
        help_hint: None,
        metaphor_explanation: Some(entry.verb.metaphor().to_string()),
        output,
        flags,
    }
}

fn unknown(command: &str) -> CommandResult {
    let attempted = command.split_whitespace().nth(1).unwrap_or("");
    let suggestions = suggest::suggest_verbs(attempted);
    debug!(attempted, ?suggestions, "unknown docker verb");

    // A known verb in the wrong shape: show how it is written instead of
    // suggesting the same verb back.
    let hint = if let Some(verb) = Verb::from_name(&attempted.to_lowercase()) {
        format!("Usage: {}", verb.usage())
    } else if suggestions.is_empty() {
        format!("Supported commands: {}", grammar::supported_verbs())
    } else {
        let names: Vec<&str> = suggestions.iter().map(|v| v.as_str()).collect();
        format!("Did you mean: {}?", names.join(", "))
    };

    CommandResult::invalid(
        command,
        format!("❌ Unknown Docker command: '{}'", attempted),
        hint,
    )
}

fn success_message(verb: Verb, target: &str, flags: &Flags) -> String {
    let mut message = verb.success_message(target);
    if flags.all {
        message.push_str(" (including stopped)");
    }
    if flags.detach {
        message.push_str(" in background mode");
    }
    if let Some(port) = &flags.port {
        message.push_str(&format!(" with port mapping {}", port));
    }
    if let Some(name) = &flags.name {
        message.push_str(&format!(" with name '{}'", name));
    }
    message
}

static PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-p|--publish)(?:\s+|=)(\d+):(\d+)").expect("static regex must compile")
});
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)--name(?:\s+|=)([^\s-]\S*)").expect("static regex must compile")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-t|--tag)(?:\s+|=)([^\s-]\S*)").expect("static regex must compile")
});

/// Extract recognised options from the flags portion of a command.
///
/// Switches are read per token: `--all`, `--force` and `--detach` by name,
/// and short clusters such as `-a` or `-fd` letter by letter. Tokens that
/// are values of other options (`--name=my-app`) never set a switch.
pub fn parse_flags(flags: &str) -> Flags {
    let mut out = Flags::default();

    for token in flags.split_whitespace() {
        match token {
            "--all" => out.all = true,
            "--force" => out.force = true,
            "--detach" => out.detach = true,
            t if t.starts_with('-') && !t.starts_with("--") => {
                let letters = &t[1..];
                if letters.chars().all(|c| c.is_ascii_alphabetic()) {
                    out.all |= letters.contains('a');
                    out.force |= letters.contains('f');
                    out.detach |= letters.contains('d');
                }
            }
            _ => {}
        }
    }

    if let Some(caps) = PORT_RE.captures(flags) {
        out.port = Some(format!("{}:{}", &caps[1], &caps[2]));
    }
    if let Some(caps) = NAME_RE.captures(flags) {
        out.name = Some(caps[1].to_string());
    }
    if let Some(caps) = TAG_RE.captures(flags) {
        out.tag = Some(caps[1].to_string());
    }

    out
}
