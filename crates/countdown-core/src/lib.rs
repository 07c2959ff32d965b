// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the countdown bot.
//!
//! This crate provides the error type, shared types, the store and transport
//! adapter traits, and the fixed-timezone date handling used by every other
//! crate in the workspace.

pub mod clock;
pub mod datetime;
pub mod error;
pub mod traits;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use datetime::{
    SERVICE_TZ, TimeLeft, compose_event_date, format_event_date, parse_event_date,
    validate_event_name,
};
pub use error::CountdownError;
pub use types::{
    AdapterType, Button, ChatId, Event, EventStatus, HealthStatus, Inbound, IncomingCallback,
    IncomingText, Keyboard, MessageId, Reply, TextFormat, UserId,
};

pub use traits::{ChatTransport, EventStore, PluginAdapter};
