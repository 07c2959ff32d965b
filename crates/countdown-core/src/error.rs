// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the countdown bot.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
///
/// The user-facing variants (`InvalidFormat` through `InvalidPayload`) carry
/// messages that are safe to echo back into the originating chat.
#[derive(Debug, Error)]
pub enum CountdownError {
    /// Configuration errors (invalid TOML, missing token, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat transport errors (send/edit failure, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Date text matched none of the accepted grammars, or named an impossible instant.
    #[error("invalid date format: {0}")]
    InvalidFormat(String),

    /// Event name is empty or contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid event name '{0}': use only latin letters, digits and underscores")]
    InvalidName(String),

    /// An event with this name already exists in the chat.
    #[error("event '{name}' already exists in this chat")]
    DuplicateName { name: String },

    /// Lookup miss.
    #[error("event '{0}' not found")]
    NotFound(String),

    /// A picker button was pressed with no matching conversation.
    #[error("session expired, please run /set_date again")]
    ExpiredSession,

    /// A callback payload that does not follow the `cal:` grammar.
    #[error("invalid callback payload: {0}")]
    InvalidPayload(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CountdownError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CountdownError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true for errors that describe bad user input rather than a system fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CountdownError::InvalidFormat(_)
                | CountdownError::InvalidName(_)
                | CountdownError::DuplicateName { .. }
                | CountdownError::NotFound(_)
                | CountdownError::ExpiredSession
                | CountdownError::InvalidPayload(_)
        )
    }
}
