// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end picker conversations through the router.

use std::time::Duration;

use chrono::NaiveDate;
use countdown_agent::ConversationKey;
use countdown_core::{ChatId, EventStatus, EventStore, Keyboard, Reply, TextFormat, UserId};
use countdown_test_utils::{Outbound, TestHarness};

const CHAT: ChatId = ChatId(-1001);
const USER: UserId = UserId(42);

fn key() -> ConversationKey {
    ConversationKey::new(CHAT, USER)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn keyboard(reply: &Reply) -> &Keyboard {
    reply.keyboard.as_ref().expect("reply has a keyboard")
}

fn has_payload(reply: &Reply, payload: &str) -> bool {
    keyboard(reply).buttons().any(|b| b.payload == payload)
}

fn has_label(reply: &Reply, label: &str) -> bool {
    keyboard(reply).buttons().any(|b| b.text == label)
}

#[tokio::test]
async fn full_picker_flow_persists_event() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date meeting Q1 review")
        .await
        .unwrap();
    let calendar = h.last_reply().await;
    assert_eq!(calendar.format, TextFormat::Html);
    assert!(calendar.text.contains("<b>meeting</b>"));
    assert!(has_payload(&calendar, "cal:day:2025-09-07"));
    assert!(has_label(&calendar, "September 2025"));

    h.press(CHAT, USER, "cal:day:2025-09-07").await.unwrap();
    let pending = h.tracker.get_pending(key()).unwrap();
    assert_eq!(pending.date, Some(date(2025, 9, 7)));
    assert_eq!(pending.hour, None);
    let hours = h.last_reply().await;
    assert!(has_payload(&hours, "cal:hour:2025-09-07:14"));

    h.press(CHAT, USER, "cal:hour:2025-09-07:14").await.unwrap();
    assert_eq!(h.tracker.get_pending(key()).unwrap().hour, Some(14));
    let minutes = h.last_reply().await;
    assert!(has_payload(&minutes, "cal:min:2025-09-07:14:30"));

    h.press(CHAT, USER, "cal:min:2025-09-07:14:30").await.unwrap();
    let event = h.store.get_event(CHAT, "meeting").await.unwrap();
    assert_eq!(event.date, "2025-09-07 14:30");
    assert_eq!(event.description, "Q1 review");
    assert_eq!(event.status, EventStatus::Active);

    let confirmation = h.last_reply().await;
    assert!(confirmation.text.contains("meeting"));
    assert!(confirmation.text.contains("/meeting"));
    assert!(confirmation.keyboard.is_none());
    assert!(h.tracker.get_pending(key()).is_none());

    // One new message for the calendar; every later step edits it.
    let outbound = h.transport.outbound().await;
    assert!(matches!(outbound[0], Outbound::Sent { .. }));
    assert!(
        outbound[1..]
            .iter()
            .all(|out| matches!(out, Outbound::Edited { .. }))
    );
    assert_eq!(h.transport.answered().await.len(), 3);
}

#[tokio::test]
async fn day_without_session_reports_expiry() {
    let h = TestHarness::new().await.unwrap();

    h.press(CHAT, USER, "cal:day:2025-09-07").await.unwrap();

    assert!(h.last_reply().await.text.contains("/set_date"));
    assert!(h.store.list_events(CHAT).await.unwrap().is_empty());
    assert_eq!(h.transport.answered().await.len(), 1);
}

#[tokio::test]
async fn minute_without_session_creates_nothing() {
    let h = TestHarness::new().await.unwrap();

    h.press(CHAT, USER, "cal:min:2025-09-07:14:30").await.unwrap();

    assert!(h.last_reply().await.text.contains("expired"));
    assert!(h.store.list_events(CHAT).await.unwrap().is_empty());
}

#[tokio::test]
async fn name_prompt_flow() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date").await.unwrap();
    assert!(h.tracker.is_awaiting_name(key()));

    h.send_text(CHAT, USER, "party at the lake").await.unwrap();
    assert!(!h.tracker.is_awaiting_name(key()));
    let pending = h.tracker.get_pending(key()).unwrap();
    assert_eq!(pending.name, "party");
    assert_eq!(pending.description, "at the lake");
    assert!(keyboard(&h.last_reply().await).rows.len() > 3);
}

#[tokio::test]
async fn name_prompt_keeps_waiting_after_invalid_name() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date").await.unwrap();
    h.send_text(CHAT, USER, "no-dashes please").await.unwrap();

    assert!(h.last_reply().await.text.contains("invalid event name"));
    assert!(h.tracker.is_awaiting_name(key()));
    assert!(h.tracker.get_pending(key()).is_none());
}

#[tokio::test]
async fn name_prompt_cancelled_by_command() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date").await.unwrap();
    h.send_text(CHAT, USER, "/cancel").await.unwrap();

    assert!(!h.tracker.is_awaiting_name(key()));
    assert!(h.last_reply().await.text.contains("cancelled"));
}

#[tokio::test]
async fn other_command_replaces_name_prompt() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date").await.unwrap();
    h.send_text(CHAT, USER, "/list").await.unwrap();

    assert!(!h.tracker.is_awaiting_name(key()));
    assert_eq!(h.last_reply().await.text, "No events");
    assert!(h.tracker.is_empty());
}

#[tokio::test]
async fn invalid_name_starts_no_session() {
    let h = TestHarness::new().await.unwrap();

    h.send_text(CHAT, USER, "/set_date bad-name").await.unwrap();

    assert!(h.last_reply().await.text.contains("bad-name"));
    assert!(h.tracker.is_empty());
}

#[tokio::test]
async fn month_navigation_respects_floor() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/set_date trip").await.unwrap();

    h.press(CHAT, USER, "cal:next:2025:9").await.unwrap();
    let october = h.last_reply().await;
    assert!(has_label(&october, "October 2025"));
    assert!(has_payload(&october, "cal:prev:2025:10"));
    assert!(october.text.contains("<b>trip</b>"));

    h.press(CHAT, USER, "cal:prev:2025:10").await.unwrap();
    let september = h.last_reply().await;
    assert!(has_label(&september, "September 2025"));
    assert!(!has_payload(&september, "cal:prev:2025:9"));

    // A stale "previous" button from an older month is clamped.
    h.press(CHAT, USER, "cal:prev:2025:3").await.unwrap();
    assert!(has_label(&h.last_reply().await, "September 2025"));

    h.press(CHAT, USER, "cal:next:2025:12").await.unwrap();
    assert!(has_label(&h.last_reply().await, "January 2026"));

    // Navigation never touches the session.
    assert_eq!(h.tracker.get_pending(key()).unwrap().date, None);
}

#[tokio::test]
async fn past_days_are_inert() {
    let h = TestHarness::builder()
        .with_local_time(2025, 9, 15, 8, 0)
        .build()
        .await
        .unwrap();
    h.send_text(CHAT, USER, "/set_date trip").await.unwrap();
    let calendar = h.last_reply().await;
    assert!(!has_payload(&calendar, "cal:day:2025-09-14"));
    assert!(has_label(&calendar, "·14"));
    assert!(has_payload(&calendar, "cal:day:2025-09-15"));

    // A forged press on a past day selects nothing and shows the month again.
    h.press(CHAT, USER, "cal:day:2025-09-10").await.unwrap();
    assert_eq!(h.tracker.get_pending(key()).unwrap().date, None);
    let again = h.last_reply().await;
    assert!(has_label(&again, "September 2025"));
    assert!(!has_payload(&again, "cal:day:2025-09-10"));
    assert_eq!(h.transport.answered().await.len(), 1);
}

#[tokio::test]
async fn past_day_without_session_reports_expiry() {
    let h = TestHarness::new().await.unwrap();

    h.press(CHAT, USER, "cal:day:2025-08-15").await.unwrap();

    assert!(h.last_reply().await.text.contains("expired"));
    assert_eq!(h.transport.outbound_count().await, 1);
    assert_eq!(h.transport.answered().await.len(), 1);
}

#[tokio::test]
async fn stale_hour_and_minute_keyboards_create_nothing() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/set_date stale").await.unwrap();

    h.press(CHAT, USER, "cal:hour:2025-08-15:9").await.unwrap();
    let pending = h.tracker.get_pending(key()).unwrap();
    assert_eq!(pending.date, None);
    assert_eq!(pending.hour, None);
    assert!(has_label(&h.last_reply().await, "September 2025"));

    h.press(CHAT, USER, "cal:min:2025-08-15:9:0").await.unwrap();
    assert!(h.store.list_events(CHAT).await.unwrap().is_empty());
    // The session survives so the user can pick a real date.
    assert!(h.tracker.get_pending(key()).is_some());

    h.press(CHAT, USER, "cal:back_to_hours:2025-08-15").await.unwrap();
    assert!(has_label(&h.last_reply().await, "September 2025"));
    assert_eq!(h.tracker.get_pending(key()).unwrap().date, None);
}

#[tokio::test]
async fn back_buttons_clear_later_fields() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/set_date trip").await.unwrap();
    h.press(CHAT, USER, "cal:day:2025-09-10").await.unwrap();
    h.press(CHAT, USER, "cal:hour:2025-09-10:9").await.unwrap();

    h.press(CHAT, USER, "cal:back_to_hours:2025-09-10").await.unwrap();
    let pending = h.tracker.get_pending(key()).unwrap();
    assert_eq!(pending.date, Some(date(2025, 9, 10)));
    assert_eq!(pending.hour, None);
    assert!(has_payload(&h.last_reply().await, "cal:hour:2025-09-10:0"));

    h.press(CHAT, USER, "cal:back_to_cal").await.unwrap();
    let pending = h.tracker.get_pending(key()).unwrap();
    assert_eq!(pending.date, None);
    assert_eq!(pending.hour, None);
    assert!(has_label(&h.last_reply().await, "September 2025"));
}

#[tokio::test]
async fn back_without_session_reports_expiry() {
    let h = TestHarness::new().await.unwrap();
    h.press(CHAT, USER, "cal:back_to_cal").await.unwrap();
    assert!(h.last_reply().await.text.contains("expired"));
    h.press(CHAT, USER, "cal:back_to_hours:2025-09-10").await.unwrap();
    assert!(h.last_reply().await.text.contains("expired"));
}

#[tokio::test]
async fn cancel_button_drops_session() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/set_date trip").await.unwrap();
    h.press(CHAT, USER, "cal:day:2025-09-10").await.unwrap();

    h.press(CHAT, USER, "cal:cancel").await.unwrap();

    assert!(h.tracker.is_empty());
    assert!(h.last_reply().await.text.contains("cancelled"));
    h.press(CHAT, USER, "cal:hour:2025-09-10:9").await.unwrap();
    assert!(h.last_reply().await.text.contains("expired"));
}

#[tokio::test]
async fn ignore_and_garbage_are_acknowledged_silently() {
    let h = TestHarness::new().await.unwrap();

    h.press(CHAT, USER, "cal:ignore").await.unwrap();
    h.press(CHAT, USER, "cal:hour:2025-09-10:24").await.unwrap();
    h.press(CHAT, USER, "something else").await.unwrap();

    assert_eq!(h.transport.answered().await.len(), 3);
    assert_eq!(h.transport.outbound_count().await, 0);
}

#[tokio::test]
async fn commit_failure_reports_and_drops_session() {
    let h = TestHarness::new().await.unwrap();
    h.store
        .create_event(CHAT, "trip", "2025-10-01 00:00", "")
        .await
        .unwrap();

    h.send_text(CHAT, USER, "/set_date trip again").await.unwrap();
    h.press(CHAT, USER, "cal:day:2025-09-10").await.unwrap();
    h.press(CHAT, USER, "cal:hour:2025-09-10:9").await.unwrap();
    h.press(CHAT, USER, "cal:min:2025-09-10:9:15").await.unwrap();

    assert!(h.last_reply().await.text.contains("already exists"));
    assert!(h.tracker.get_pending(key()).is_none());
    let event = h.store.get_event(CHAT, "trip").await.unwrap();
    assert_eq!(event.date, "2025-10-01 00:00");
}

#[tokio::test]
async fn sessions_are_per_user() {
    let h = TestHarness::new().await.unwrap();
    let other = UserId(7);

    h.send_text(CHAT, USER, "/set_date mine").await.unwrap();
    h.send_text(CHAT, other, "/set_date theirs").await.unwrap();
    h.press(CHAT, other, "cal:day:2025-09-20").await.unwrap();

    assert_eq!(h.tracker.get_pending(key()).unwrap().date, None);
    let theirs = h
        .tracker
        .get_pending(ConversationKey::new(CHAT, other))
        .unwrap();
    assert_eq!(theirs.name, "theirs");
    assert_eq!(theirs.date, Some(date(2025, 9, 20)));
}

#[tokio::test]
async fn restarting_replaces_the_session() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/set_date first").await.unwrap();
    h.press(CHAT, USER, "cal:day:2025-09-20").await.unwrap();

    h.send_text(CHAT, USER, "/set_date second").await.unwrap();

    let pending = h.tracker.get_pending(key()).unwrap();
    assert_eq!(pending.name, "second");
    assert_eq!(pending.date, None);
}

#[tokio::test]
async fn cancel_command_drops_picker_session() {
    let h = TestHarness::new().await.unwrap();
    h.send_text(CHAT, USER, "/cancel").await.unwrap();
    assert_eq!(h.last_reply().await.text, "Nothing to cancel.");

    h.send_text(CHAT, USER, "/set_date trip").await.unwrap();
    h.send_text(CHAT, USER, "/cancel").await.unwrap();
    assert!(h.tracker.is_empty());
    assert!(h.last_reply().await.text.contains("cancelled"));
}

#[tokio::test(start_paused = true)]
async fn idle_session_expires() {
    let h = TestHarness::builder()
        .with_ttl_secs(60)
        .build()
        .await
        .unwrap();
    h.send_text(CHAT, USER, "/set_date trip").await.unwrap();

    tokio::time::advance(Duration::from_secs(61)).await;
    h.press(CHAT, USER, "cal:day:2025-09-10").await.unwrap();

    assert!(h.last_reply().await.text.contains("expired"));
    assert!(h.tracker.is_empty());
}
