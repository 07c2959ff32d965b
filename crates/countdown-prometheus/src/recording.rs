// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade, so these calls are no-ops until a recorder
//! is installed.

use metrics::{describe_counter, describe_gauge};

/// Register all metric descriptions. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "countdown_commands_total",
        "Text commands handled, by command"
    );
    describe_counter!(
        "countdown_callbacks_total",
        "Picker button presses handled, by action"
    );
    describe_counter!(
        "countdown_events_created_total",
        "Events persisted, by creation mode"
    );
    describe_gauge!(
        "countdown_pending_conversations",
        "Picker sessions and name prompts currently held in memory"
    );
}

/// Record a handled command. Event-name lookups share the `lookup` label.
pub fn record_command(command: &str) {
    metrics::counter!("countdown_commands_total", "command" => command.to_string()).increment(1);
}

/// Record a handled picker button press.
pub fn record_callback(action: &str) {
    metrics::counter!("countdown_callbacks_total", "action" => action.to_string()).increment(1);
}

/// Record a persisted event (`interactive` or `direct`).
pub fn record_event_created(mode: &str) {
    metrics::counter!("countdown_events_created_total", "mode" => mode.to_string()).increment(1);
}

/// Set the number of live conversation slots.
pub fn set_pending_conversations(count: usize) {
    metrics::gauge!("countdown_pending_conversations").set(count as f64);
}
