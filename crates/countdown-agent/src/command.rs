// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text command parsing.

/// A recognized text command. Anything that is not a fixed command is
/// treated as an event-name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetDate,
    List,
    Active,
    Outdated,
    Help,
    Cancel,
    Lookup(String),
}

impl Command {
    /// Stable label for metrics and logs. Lookups share one label.
    pub fn label(&self) -> &'static str {
        match self {
            Command::SetDate => "set_date",
            Command::List => "list",
            Command::Active => "active",
            Command::Outdated => "outdated",
            Command::Help => "help",
            Command::Cancel => "cancel",
            Command::Lookup(_) => "lookup",
        }
    }
}

/// A parsed command and its whitespace-separated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub command: Command,
    pub args: Vec<&'a str>,
}

/// Parses `/command[@botname] args...`. Returns `None` for text that is not
/// a command. Matching is case-sensitive.
pub fn parse_command(text: &str) -> Option<CommandLine<'_>> {
    let mut tokens = text.trim().split_whitespace();
    let head = tokens.next()?.strip_prefix('/')?;
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let command = match name {
        "set_date" => Command::SetDate,
        "list" | "all" => Command::List,
        "active" => Command::Active,
        "outdated" => Command::Outdated,
        "help" | "start" => Command::Help,
        "cancel" => Command::Cancel,
        other => Command::Lookup(other.to_string()),
    };

    Some(CommandLine {
        command,
        args: tokens.collect(),
    })
}

/// Commands advertised in the platform's command menu.
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("set_date", "Create an event: /set_date [name] or /set_date <date> [time] <name>"),
        ("list", "List events of this chat and the shared chat"),
        ("active", "List upcoming events"),
        ("outdated", "List past events"),
        ("cancel", "Abort event creation"),
        ("help", "Show usage"),
    ]
}
