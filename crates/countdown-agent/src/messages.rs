// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.

use chrono::NaiveDate;
use countdown_core::{ChatId, CountdownError, Event, TimeLeft};

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

pub fn calendar_prompt(name: &str) -> String {
    format!("📅 Pick a date for event <b>{}</b>:", escape_html(name))
}

pub fn hour_prompt(name: &str, date: NaiveDate) -> String {
    format!(
        "🕐 Pick an hour for event <b>{}</b> on {date}:",
        escape_html(name)
    )
}

pub fn minute_prompt(name: &str, date: NaiveDate, hour: u32) -> String {
    format!(
        "🕐 Pick minutes for event <b>{}</b> on {date} {hour:02}:__",
        escape_html(name)
    )
}

pub fn name_prompt() -> &'static str {
    "✏️ Send the event name, optionally followed by a description.\n\
     Names may contain latin letters, digits and underscores. /cancel aborts."
}

pub fn cancelled() -> &'static str {
    "❌ Event creation cancelled."
}

pub fn nothing_to_cancel() -> &'static str {
    "Nothing to cancel."
}

pub fn session_expired() -> String {
    format!("⚠️ {}", capitalize(&CountdownError::ExpiredSession.to_string()))
}

/// Confirmation for an event created through the picker (HTML).
pub fn created_interactive(name: &str, date: &str) -> String {
    let name = escape_html(name);
    format!("✅ Event <b>{name}</b> created for {date}!\nUse /{name} for details.")
}

/// Confirmation for an event created directly from `/set_date` arguments.
pub fn created_direct(name: &str, date: &str) -> String {
    format!("Event '{name}' added for {date}! Use /{name} for details.")
}

pub fn creation_failed(err: &CountdownError) -> String {
    format!("❌ Could not create the event: {}", user_error_text(err))
}

pub fn invalid_date(raw: &str) -> String {
    format!(
        "Could not parse date '{raw}'. Accepted formats: YYYY-MM-DD HH:MM, YYYY-MM-DD, DD.MM.YYYY."
    )
}

pub fn set_date_usage() -> &'static str {
    "Usage:\n\
     /set_date - pick a date interactively\n\
     /set_date event_name [description] - pick a date for event_name\n\
     /set_date YYYY-MM-DD HH:MM event_name [description]\n\
     /set_date YYYY-MM-DD event_name [description] (time 00:00)\n\
     /set_date DD.MM.YYYY event_name [description] (time 00:00)"
}

pub fn help_text() -> &'static str {
    "Commands:\n\
     /set_date - create an event with the date picker\n\
     /set_date event_name [description] - same, with the name given up front\n\
     /set_date YYYY-MM-DD HH:MM event_name [description] - add an event with a time\n\
     /set_date YYYY-MM-DD event_name [description] - add an event (time 00:00)\n\
     /set_date DD.MM.YYYY event_name [description] - add an event (legacy format)\n\
     /list or /all - list events\n\
     /active - upcoming events\n\
     /outdated - past events\n\
     /cancel - abort event creation\n\
     /help - this help\n\
     /event_name - time left until the event"
}

pub fn not_found(name: &str) -> String {
    format!("Event '{name}' not found")
}

pub fn internal_error() -> &'static str {
    "Something went wrong, please try again later."
}

/// Text shown for an error in reply to a user action. System faults are not
/// echoed verbatim.
pub fn user_error_text(err: &CountdownError) -> String {
    if err.is_user_error() {
        err.to_string()
    } else {
        internal_error().to_string()
    }
}

/// Which subset a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    All,
    Active,
    Outdated,
}

/// Renders an event listing. `All` also shows each invocation command.
pub fn event_list(kind: ListKind, events: &[Event]) -> String {
    if events.is_empty() {
        return match kind {
            ListKind::All => "No events",
            ListKind::Active => "No active events",
            ListKind::Outdated => "No outdated events",
        }
        .to_string();
    }

    let mut text = match kind {
        ListKind::All => "Events:\n",
        ListKind::Active => "Active events:\n",
        ListKind::Outdated => "Outdated events:\n",
    }
    .to_string();
    for event in events {
        match kind {
            ListKind::All => text.push_str(&format!(
                "- {}: {} (command /{})\n",
                event.name, event.date, event.name
            )),
            _ => text.push_str(&format!("- {}: {}\n", event.name, event.date)),
        }
    }
    text
}

/// Reply to a lookup. `found_in` is set when the event came from another chat.
pub fn event_details(event: &Event, left: Option<TimeLeft>, found_in: Option<ChatId>) -> String {
    let mut text = format!("Event: {}\nDate: {}\n", event.name, event.date);
    if !event.description.is_empty() {
        text.push_str(&format!("Description: {}\n", event.description));
    }
    match left {
        Some(left) => text.push_str(&format!("Time left: {left}")),
        None => text.push_str("The event has already passed"),
    }
    if found_in.is_some() {
        text.push_str("\n(found in the shared chat)");
    }
    text
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
