// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core behavior of the countdown bot.
//!
//! Text commands and picker button presses enter through
//! [`CommandRouter::handle`]. Interactive event creation is driven by the
//! [`ConversationController`], whose per-user state lives in a
//! [`ConversationTracker`]. Keyboards are rendered by the pure builders in
//! [`picker`] and their button payloads are encoded by [`CalendarAction`].

pub mod callback;
pub mod command;
pub mod controller;
pub mod messages;
pub mod picker;
pub mod router;
pub mod shutdown;
pub mod state;
pub mod sweeper;

pub use callback::{CalendarAction, MINUTE_STEP, YearMonth};
pub use command::{Command, CommandLine, bot_commands, parse_command};
pub use controller::ConversationController;
pub use picker::{build_calendar, build_hour_picker, build_minute_picker};
pub use router::CommandRouter;
pub use shutdown::install_signal_handler;
pub use state::{ConversationKey, ConversationTracker, PendingEvent};
pub use sweeper::spawn_sweeper;
