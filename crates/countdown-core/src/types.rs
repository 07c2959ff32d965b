// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters and the conversation core.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Platform identifier of a chat (private, group or channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message, as issued by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Observability,
}

/// Lifecycle status of an event. The only transition is `Active -> Outdated`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Outdated,
}

/// A persisted event, unique per `(chat_id, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub chat_id: ChatId,
    pub name: String,
    /// Canonical `YYYY-MM-DD HH:MM` text in the service timezone.
    pub date: String,
    /// Empty when the creator gave none.
    pub description: String,
    pub status: EventStatus,
    pub created_at: String,
}

// --- Transport-facing types ---

/// One inline button. `payload` is round-tripped back on press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub payload: String,
}

impl Button {
    pub fn new(text: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: payload.into(),
        }
    }
}

/// Rows of inline buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Iterates over every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// How the transport should interpret message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// An outbound message body: text, formatting and optional buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            keyboard: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingText {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub text: String,
}

/// A button press received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCallback {
    /// Transport handle used to acknowledge the press.
    pub callback_id: String,
    pub chat_id: ChatId,
    pub user_id: UserId,
    /// The message carrying the pressed keyboard, edited in place when known.
    pub message_id: Option<MessageId>,
    pub payload: String,
}

/// Everything the router can receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(IncomingText),
    Callback(IncomingCallback),
}
