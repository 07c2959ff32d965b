// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for countdown integration tests.
//!
//! Provides mock adapters and a harness for fast, deterministic tests
//! without a Telegram connection.
//!
//! # Components
//!
//! - [`MockTransport`] - captures sent messages, edits and callback acks
//! - [`FixedClock`] - a settable clock in the service timezone
//! - [`TestHarness`] - temp SQLite store, mock transport and a wired router

pub mod clock;
pub mod harness;
pub mod mock_transport;

pub use clock::FixedClock;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_transport::{MockTransport, Outbound};
