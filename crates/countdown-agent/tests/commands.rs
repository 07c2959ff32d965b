// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text command behavior: direct creation, listings and lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use countdown_agent::{CommandRouter, ConversationController, ConversationTracker};
use countdown_config::model::StorageConfig;
use countdown_core::{
    AdapterType, ChatId, ChatTransport, Clock, CountdownError, Event, EventStatus, EventStore,
    HealthStatus, Inbound, IncomingText, PluginAdapter, UserId,
};
use countdown_storage::SqliteEventStore;
use countdown_test_utils::{FixedClock, MockTransport, TestHarness};

const CHAT: ChatId = ChatId(-1001);
const SHARED: ChatId = ChatId(-2002);
const USER: UserId = UserId(42);

#[tokio::test]
async fn direct_creation_with_time() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-12-31 14:30 party with cake")
        .await
        .unwrap();

    let event = h.store.get_event(CHAT, "party").await.unwrap();
    assert_eq!(event.date, "2025-12-31 14:30");
    assert_eq!(event.description, "with cake");
    assert_eq!(event.status, EventStatus::Active);
    let reply = h.last_reply().await.text;
    assert!(reply.contains("/party"));
    assert!(h.tracker.is_empty());
}

#[tokio::test]
async fn direct_creation_accepts_every_date_grammar() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-9-7 short").await.unwrap();
    h.send_text(CHAT, USER, "/set_date 31.12.2025 legacy").await.unwrap();
    h.send_text(CHAT, USER, "/set_date 2025-12-31 9:05 early").await.unwrap();

    let dates: Vec<(String, String)> = h
        .store
        .list_events(CHAT)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.name, e.date))
        .collect();
    assert_eq!(
        dates,
        vec![
            ("short".to_string(), "2025-09-07 00:00".to_string()),
            ("legacy".to_string(), "2025-12-31 00:00".to_string()),
            ("early".to_string(), "2025-12-31 09:05".to_string()),
        ]
    );
}

#[tokio::test]
async fn direct_creation_rejects_duplicates() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-12-31 foo first").await.unwrap();
    h.send_text(CHAT, USER, "/set_date 2026-01-31 foo second").await.unwrap();

    assert!(h.last_reply().await.text.contains("already exists"));
    let events = h.store.list_events(CHAT).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].description, "first");
}

#[tokio::test]
async fn same_name_is_allowed_in_another_chat() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-12-31 foo").await.unwrap();
    h.send_text(SHARED, USER, "/set_date 2025-12-31 foo").await.unwrap();

    assert!(h.store.get_event(CHAT, "foo").await.is_ok());
    assert!(h.store.get_event(SHARED, "foo").await.is_ok());
}

#[tokio::test]
async fn direct_creation_reports_raw_bad_date() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-13-45 foo").await.unwrap();

    assert!(h.last_reply().await.text.contains("'2025-13-45'"));
    assert!(h.store.list_events(CHAT).await.unwrap().is_empty());
}

#[tokio::test]
async fn direct_creation_needs_a_name() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-12-31").await.unwrap();
    assert!(h.last_reply().await.text.starts_with("Usage:"));

    h.send_text(CHAT, USER, "/set_date 2025-12-31 14:30").await.unwrap();
    assert!(h.last_reply().await.text.starts_with("Usage:"));
}

#[tokio::test]
async fn direct_creation_validates_name() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date 2025-12-31 bad.name").await.unwrap();

    assert!(h.last_reply().await.text.contains("invalid event name"));
    assert!(h.store.list_events(CHAT).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_merges_fallback_chat() {
    let h = TestHarness::builder()
        .with_fallback_chat(SHARED)
        .build()
        .await
        .unwrap();
    h.store
        .create_event(CHAT, "local", "2025-10-01 00:00", "")
        .await
        .unwrap();
    h.store
        .create_event(SHARED, "shared", "2025-11-01 00:00", "")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/list").await.unwrap();
    let text = h.last_reply().await.text;
    assert!(text.contains("- local: 2025-10-01 00:00 (command /local)"));
    assert!(text.contains("- shared: 2025-11-01 00:00 (command /shared)"));
    assert!(text.find("local").unwrap() < text.find("shared").unwrap());

    // Inside the fallback chat nothing is merged twice.
    h.send_text(SHARED, USER, "/all").await.unwrap();
    let text = h.last_reply().await.text;
    assert_eq!(text.matches("shared:").count(), 1);
    assert!(!text.contains("local"));
}

#[tokio::test]
async fn active_and_outdated_filter_by_status() {
    let h = TestHarness::builder()
        .with_fallback_chat(SHARED)
        .build()
        .await
        .unwrap();
    h.store
        .create_event(CHAT, "soon", "2025-10-01 00:00", "")
        .await
        .unwrap();
    h.store
        .create_event(SHARED, "gone", "2020-01-01 00:00", "")
        .await
        .unwrap();
    h.store
        .update_event_status(SHARED, "gone", EventStatus::Outdated)
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/active").await.unwrap();
    let active = h.last_reply().await.text;
    assert!(active.starts_with("Active events:"));
    assert!(active.contains("soon"));
    assert!(!active.contains("gone"));

    h.send_text(CHAT, USER, "/outdated").await.unwrap();
    let outdated = h.last_reply().await.text;
    assert!(outdated.contains("- gone: 2020-01-01 00:00"));
    assert!(!outdated.contains("soon"));
}

#[tokio::test]
async fn empty_listings() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/active").await.unwrap();
    assert_eq!(h.last_reply().await.text, "No active events");
}

#[tokio::test]
async fn lookup_reports_time_left() {
    let h = TestHarness::new().await.unwrap();
    h.store
        .create_event(CHAT, "trip", "2025-09-03 12:30", "to the sea")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/trip").await.unwrap();

    let text = h.last_reply().await.text;
    assert!(text.contains("Date: 2025-09-03 12:30"));
    assert!(text.contains("Description: to the sea"));
    assert!(text.contains("Time left: 2 days, 2 hours, 30 minutes"));
}

#[tokio::test]
async fn lookup_strips_bot_suffix() {
    let h = TestHarness::new().await.unwrap();
    h.store
        .create_event(CHAT, "trip", "2025-09-03 12:30", "")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/trip@countdown_bot").await.unwrap();
    assert!(h.last_reply().await.text.contains("Event: trip"));
}

#[tokio::test]
async fn lookup_falls_back_to_other_chats() {
    let h = TestHarness::builder()
        .with_fallback_chat(SHARED)
        .build()
        .await
        .unwrap();
    h.store
        .create_event(SHARED, "launch", "2025-09-02 10:00", "")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/launch").await.unwrap();

    let text = h.last_reply().await.text;
    assert!(text.contains("Time left: 1 days, 0 hours, 0 minutes"));
    assert!(text.contains("shared chat"));
}

#[tokio::test]
async fn lookup_miss_reports_not_found() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/nope").await.unwrap();
    assert_eq!(h.last_reply().await.text, "Event 'nope' not found");
}

#[tokio::test]
async fn plain_text_is_ignored() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "hello there").await.unwrap();
    assert_eq!(h.transport.outbound_count().await, 0);
}

#[tokio::test]
async fn help_lists_commands() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/start").await.unwrap();
    let text = h.last_reply().await.text;
    for command in ["/set_date", "/list", "/active", "/outdated", "/cancel"] {
        assert!(text.contains(command), "{command}");
    }
}

#[tokio::test]
async fn creator_is_linked_to_event() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/set_date 2025-12-31 foo").await.unwrap();

    let linked = h.store.events_for_user(CHAT, USER).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].name, "foo");
}

/// Delegating store that counts status writes.
struct CountingStore {
    inner: SqliteEventStore,
    status_writes: AtomicUsize,
}

#[async_trait]
impl PluginAdapter for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CountdownError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), CountdownError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl EventStore for CountingStore {
    async fn initialize(&self) -> Result<(), CountdownError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), CountdownError> {
        self.inner.close().await
    }

    async fn create_event(
        &self,
        chat: ChatId,
        name: &str,
        date: &str,
        description: &str,
    ) -> Result<Event, CountdownError> {
        self.inner.create_event(chat, name, date, description).await
    }

    async fn get_event(&self, chat: ChatId, name: &str) -> Result<Event, CountdownError> {
        self.inner.get_event(chat, name).await
    }

    async fn list_events(&self, chat: ChatId) -> Result<Vec<Event>, CountdownError> {
        self.inner.list_events(chat).await
    }

    async fn find_event_across_chats(
        &self,
        name: &str,
        exclude: ChatId,
        prefer: Option<ChatId>,
    ) -> Result<(Event, ChatId), CountdownError> {
        self.inner
            .find_event_across_chats(name, exclude, prefer)
            .await
    }

    async fn update_event_status(
        &self,
        chat: ChatId,
        name: &str,
        status: EventStatus,
    ) -> Result<(), CountdownError> {
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_event_status(chat, name, status).await
    }

    async fn link_event_to_user(
        &self,
        chat: ChatId,
        user: UserId,
        event_id: i64,
    ) -> Result<(), CountdownError> {
        self.inner.link_event_to_user(chat, user, event_id).await
    }
}

#[tokio::test]
async fn past_event_is_flipped_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CountingStore {
        inner: SqliteEventStore::new(StorageConfig {
            database_path: dir.path().join("flip.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }),
        status_writes: AtomicUsize::new(0),
    });
    store.initialize().await.unwrap();
    store
        .create_event(CHAT, "old", "2025-08-01 09:00", "")
        .await
        .unwrap();

    let transport = Arc::new(MockTransport::new());
    let controller = ConversationController::new(
        store.clone() as Arc<dyn EventStore>,
        transport.clone() as Arc<dyn ChatTransport>,
        Arc::new(ConversationTracker::new(None)),
        Arc::new(FixedClock::at(2025, 9, 1, 10, 0)) as Arc<dyn Clock>,
    );
    let router = CommandRouter::new(controller, None);
    let lookup = || {
        Inbound::Text(IncomingText {
            chat_id: CHAT,
            user_id: USER,
            text: "/old".to_string(),
        })
    };

    router.handle(lookup()).await.unwrap();
    assert_eq!(store.status_writes.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.get_event(CHAT, "old").await.unwrap().status,
        EventStatus::Outdated
    );
    let reply = transport.last_reply().await.unwrap().text;
    assert!(reply.contains("already passed"));

    router.handle(lookup()).await.unwrap();
    assert_eq!(store.status_writes.load(Ordering::SeqCst), 1);

    store.close().await.unwrap();
}

#[tokio::test]
async fn future_event_is_not_flipped() {
    let h = TestHarness::new().await.unwrap();
    h.store
        .create_event(CHAT, "later", "2025-09-01 10:01", "")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/later").await.unwrap();

    assert_eq!(
        h.store.get_event(CHAT, "later").await.unwrap().status,
        EventStatus::Active
    );
    assert!(h.last_reply().await.text.contains("0 days, 0 hours, 1 minutes"));
}

#[tokio::test]
async fn flip_in_fallback_chat_updates_that_chat() {
    let h = TestHarness::builder()
        .with_fallback_chat(SHARED)
        .build()
        .await
        .unwrap();
    h.store
        .create_event(SHARED, "past", "2024-01-01 00:00", "")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/past").await.unwrap();

    assert_eq!(
        h.store.get_event(SHARED, "past").await.unwrap().status,
        EventStatus::Outdated
    );
}
