// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation tests.
//!
//! `TestHarness` wires a [`CommandRouter`] to a temp SQLite store, a
//! [`MockTransport`] and a [`FixedClock`]. Tests drive it with
//! [`TestHarness::send_text`] and [`TestHarness::press`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::DateTime;
use chrono_tz::Tz;

use countdown_agent::{CommandRouter, ConversationController, ConversationTracker};
use countdown_config::model::StorageConfig;
use countdown_core::{
    ChatId, ChatTransport, Clock, CountdownError, EventStore, Inbound, IncomingCallback,
    IncomingText, Reply, UserId,
};
use countdown_storage::SqliteEventStore;

use crate::clock::FixedClock;
use crate::mock_transport::MockTransport;

/// Builder for test environments.
pub struct TestHarnessBuilder {
    now: Option<DateTime<Tz>>,
    fallback_chat: Option<ChatId>,
    ttl_secs: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: None,
            fallback_chat: None,
            ttl_secs: 0,
        }
    }

    /// Freeze the clock at this instant. Defaults to 2025-09-01 10:00.
    pub fn with_now(mut self, now: DateTime<Tz>) -> Self {
        self.now = Some(now);
        self
    }

    /// Freeze the clock at a local wall time in the service timezone.
    pub fn with_local_time(mut self, year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        self.now = Some(FixedClock::at(year, month, day, hour, minute).now());
        self
    }

    /// Configure the shared fallback chat.
    pub fn with_fallback_chat(mut self, chat: ChatId) -> Self {
        self.fallback_chat = Some(chat);
        self
    }

    /// Conversation idle TTL. Defaults to `0` (never expires).
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Creates the temp database and wires every component.
    pub async fn build(self) -> Result<TestHarness, CountdownError> {
        let temp_dir = tempfile::TempDir::new().map_err(CountdownError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let store = Arc::new(SqliteEventStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        store.initialize().await?;

        let transport = Arc::new(MockTransport::new());
        let clock = Arc::new(match self.now {
            Some(now) => FixedClock::new(now),
            None => FixedClock::at(2025, 9, 1, 10, 0),
        });
        let tracker = Arc::new(ConversationTracker::with_ttl_secs(self.ttl_secs));

        let controller = ConversationController::new(
            store.clone() as Arc<dyn EventStore>,
            transport.clone() as Arc<dyn ChatTransport>,
            tracker.clone(),
            clock.clone() as Arc<dyn Clock>,
        );
        let router = CommandRouter::new(controller, self.fallback_chat);

        Ok(TestHarness {
            store,
            transport,
            clock,
            tracker,
            router,
            callback_seq: AtomicU64::new(0),
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired bot backed by mocks and a temp database.
pub struct TestHarness {
    pub store: Arc<SqliteEventStore>,
    pub transport: Arc<MockTransport>,
    pub clock: Arc<FixedClock>,
    pub tracker: Arc<ConversationTracker>,
    pub router: CommandRouter,
    callback_seq: AtomicU64,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings.
    pub async fn new() -> Result<Self, CountdownError> {
        Self::builder().build().await
    }

    /// Delivers a text message from `user` in `chat`.
    pub async fn send_text(
        &self,
        chat: ChatId,
        user: UserId,
        text: &str,
    ) -> Result<(), CountdownError> {
        self.router
            .handle(Inbound::Text(IncomingText {
                chat_id: chat,
                user_id: user,
                text: text.to_string(),
            }))
            .await
    }

    /// Presses a button on the most recently sent message and returns the
    /// callback id used.
    pub async fn press(
        &self,
        chat: ChatId,
        user: UserId,
        payload: &str,
    ) -> Result<String, CountdownError> {
        let seq = self.callback_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let callback_id = format!("cb-{seq}");
        self.router
            .handle(Inbound::Callback(IncomingCallback {
                callback_id: callback_id.clone(),
                chat_id: chat,
                user_id: user,
                message_id: self.transport.last_sent_id().await,
                payload: payload.to_string(),
            }))
            .await?;
        Ok(callback_id)
    }

    /// The latest reply, sent or edited.
    pub async fn last_reply(&self) -> Reply {
        self.transport
            .last_reply()
            .await
            .expect("no reply was produced")
    }

    pub async fn shutdown(&self) -> Result<(), CountdownError> {
        self.store.close().await
    }
}
