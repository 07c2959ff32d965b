// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background purge of idle conversation slots.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::state::ConversationTracker;

/// Spawns a task that drops expired slots every `period` until `cancel` fires.
///
/// Expired slots are already invisible to readers; the sweep only reclaims
/// memory for users who never come back.
pub fn spawn_sweeper(
    tracker: Arc<ConversationTracker>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // Skip the first immediate tick.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let purged = tracker.purge_expired();
                    if purged > 0 {
                        debug!(purged, remaining = tracker.len(), "purged idle conversations");
                    }
                    #[cfg(feature = "prometheus")]
                    countdown_prometheus::set_pending_conversations(tracker.len());
                }
                _ = cancel.cancelled() => {
                    info!("conversation sweeper shutting down");
                    break;
                }
            }
        }
    })
}
