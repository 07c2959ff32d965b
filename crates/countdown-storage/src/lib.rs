// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite event store for the countdown bot.
//!
//! WAL-mode SQLite with embedded refinery migrations and a single-writer
//! concurrency model via `tokio-rusqlite`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteEventStore;
pub use database::Database;
