// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive event creation: name prompt, calendar, hour and minute steps.
//!
//! The controller owns no state of its own. Conversation slots live in the
//! injected [`ConversationTracker`]; events are persisted through the
//! [`EventStore`] only when the minute step completes.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use countdown_core::{
    ChatId, ChatTransport, Clock, CountdownError, Event, EventStore, IncomingCallback,
    MessageId, Reply, UserId, compose_event_date, format_event_date, validate_event_name,
};

use crate::callback::{CalendarAction, YearMonth};
use crate::command::{Command, parse_command};
use crate::messages;
use crate::picker::{build_calendar, build_hour_picker, build_minute_picker};
use crate::state::{ConversationKey, ConversationTracker, PendingEvent};

/// Drives the picker state machine for every `(chat, user)` pair.
pub struct ConversationController {
    store: Arc<dyn EventStore>,
    transport: Arc<dyn ChatTransport>,
    tracker: Arc<ConversationTracker>,
    clock: Arc<dyn Clock>,
}

impl ConversationController {
    pub fn new(
        store: Arc<dyn EventStore>,
        transport: Arc<dyn ChatTransport>,
        tracker: Arc<ConversationTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            transport,
            tracker,
            clock,
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub fn transport(&self) -> &Arc<dyn ChatTransport> {
        &self.transport
    }

    pub fn tracker(&self) -> &Arc<ConversationTracker> {
        &self.tracker
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Starts the picker for a named event and sends the current month.
    ///
    /// An invalid name is reported and no session is created.
    pub async fn begin_with_name(
        &self,
        chat: ChatId,
        user: UserId,
        name: &str,
        description: &str,
    ) -> Result<(), CountdownError> {
        if let Err(e) = validate_event_name(name) {
            debug!(chat_id = %chat, user_id = %user, event_name = name, "rejected event name");
            self.transport
                .send_message(chat, Reply::plain(e.to_string()))
                .await?;
            return Ok(());
        }

        let key = ConversationKey::new(chat, user);
        self.tracker
            .set_pending(key, PendingEvent::new(name, description));
        info!(chat_id = %chat, user_id = %user, event_name = name, "picker session started");

        let today = self.clock.today();
        let reply = self.calendar_reply(name, YearMonth::of(today), today);
        self.transport.send_message(chat, reply).await?;
        Ok(())
    }

    /// Asks the user to type the event name as their next message.
    pub async fn begin_awaiting_name(&self, chat: ChatId, user: UserId) -> Result<(), CountdownError> {
        self.tracker
            .set_awaiting_name(ConversationKey::new(chat, user));
        debug!(chat_id = %chat, user_id = %user, "awaiting event name");
        self.transport
            .send_message(chat, Reply::plain(messages::name_prompt()))
            .await?;
        Ok(())
    }

    /// Consumes a text message if the user was asked for an event name.
    ///
    /// Returns `false` when the text was not consumed. A command other than
    /// `/cancel` clears the prompt silently and is left for the router.
    pub async fn handle_free_text(
        &self,
        chat: ChatId,
        user: UserId,
        text: &str,
    ) -> Result<bool, CountdownError> {
        let key = ConversationKey::new(chat, user);
        if !self.tracker.is_awaiting_name(key) {
            return Ok(false);
        }

        let text = text.trim();
        if text.starts_with('/') {
            self.tracker.clear_awaiting_name(key);
            let is_cancel = parse_command(text).is_some_and(|line| line.command == Command::Cancel);
            if !is_cancel {
                debug!(chat_id = %chat, user_id = %user, "name prompt replaced by a command");
                return Ok(false);
            }
            self.transport
                .send_message(chat, Reply::plain(messages::cancelled()))
                .await?;
            return Ok(true);
        }

        if text.is_empty() {
            self.tracker.clear_awaiting_name(key);
            self.transport
                .send_message(chat, Reply::plain(messages::cancelled()))
                .await?;
            return Ok(true);
        }

        let (name, description) = split_name(text);
        if let Err(e) = validate_event_name(name) {
            // The prompt stays open so the user can try another name.
            self.transport
                .send_message(chat, Reply::plain(e.to_string()))
                .await?;
            return Ok(true);
        }

        self.begin_with_name(chat, user, name, description).await?;
        Ok(true)
    }

    /// Applies a picker button press. The press is always acknowledged.
    pub async fn handle_callback(&self, callback: &IncomingCallback) -> Result<(), CountdownError> {
        let outcome = self.apply_callback(callback).await;
        if let Err(e) = self.transport.answer_callback(&callback.callback_id).await {
            warn!(
                error = %e,
                callback_id = %callback.callback_id,
                "failed to acknowledge callback"
            );
        }
        outcome
    }

    async fn apply_callback(&self, callback: &IncomingCallback) -> Result<(), CountdownError> {
        let chat = callback.chat_id;
        let user = callback.user_id;
        let target = callback.message_id.as_ref();

        let action = match callback.payload.parse::<CalendarAction>() {
            Ok(action) => action,
            Err(e) => {
                warn!(chat_id = %chat, user_id = %user, error = %e, "ignoring callback");
                #[cfg(feature = "prometheus")]
                countdown_prometheus::record_callback("invalid");
                return Ok(());
            }
        };

        #[cfg(feature = "prometheus")]
        countdown_prometheus::record_callback(action.label());
        debug!(chat_id = %chat, user_id = %user, action = action.label(), "callback");

        let key = ConversationKey::new(chat, user);
        let today = self.clock.today();

        match action {
            CalendarAction::Ignore => Ok(()),

            CalendarAction::Cancel => {
                self.tracker.clear(key);
                info!(chat_id = %chat, user_id = %user, "picker cancelled");
                self.show(chat, target, Reply::plain(messages::cancelled()))
                    .await
            }

            CalendarAction::PrevMonth(shown) | CalendarAction::NextMonth(shown) => {
                let adjacent = match action {
                    CalendarAction::PrevMonth(_) => shown.prev(),
                    _ => shown.next(),
                };
                let month = adjacent.unwrap_or(shown).max(YearMonth::of(today));
                let name = self
                    .tracker
                    .get_pending(key)
                    .map(|pending| pending.name)
                    .unwrap_or_default();
                self.show(chat, target, self.calendar_reply(&name, month, today))
                    .await
            }

            CalendarAction::Day(date)
            | CalendarAction::Hour { date, .. }
            | CalendarAction::Minute { date, .. }
            | CalendarAction::BackToHours(date)
                if date < today =>
            {
                self.past_date(key, target, date, today).await
            }

            CalendarAction::Day(date) => {
                let Some(pending) = self.tracker.update_pending(key, |pending| {
                    pending.date = Some(date);
                    pending.hour = None;
                }) else {
                    return self.session_expired(chat, target).await;
                };
                self.show(chat, target, hour_reply(&pending.name, date))
                    .await
            }

            CalendarAction::Hour { date, hour } => {
                let Some(pending) = self.tracker.update_pending(key, |pending| {
                    pending.date = Some(date);
                    pending.hour = Some(hour);
                }) else {
                    return self.session_expired(chat, target).await;
                };
                self.show(chat, target, minute_reply(&pending.name, date, hour))
                    .await
            }

            CalendarAction::Minute { date, hour, minute } => {
                self.commit(key, target, date, hour, minute).await
            }

            CalendarAction::BackToCalendar => {
                let Some(pending) = self.tracker.update_pending(key, |pending| {
                    pending.date = None;
                    pending.hour = None;
                }) else {
                    return self.session_expired(chat, target).await;
                };
                self.show(
                    chat,
                    target,
                    self.calendar_reply(&pending.name, YearMonth::of(today), today),
                )
                .await
            }

            CalendarAction::BackToHours(date) => {
                let Some(pending) = self.tracker.update_pending(key, |pending| {
                    pending.date = Some(date);
                    pending.hour = None;
                }) else {
                    return self.session_expired(chat, target).await;
                };
                self.show(chat, target, hour_reply(&pending.name, date))
                    .await
            }
        }
    }

    /// Final step: persist the event and close the session either way.
    async fn commit(
        &self,
        key: ConversationKey,
        target: Option<&MessageId>,
        date: NaiveDate,
        hour: u32,
        minute: u32,
    ) -> Result<(), CountdownError> {
        let chat = key.chat;
        let Some(pending) = self.tracker.take_pending(key) else {
            return self.session_expired(chat, target).await;
        };

        let created = match compose_event_date(date, hour, minute) {
            Ok(instant) => {
                self.store
                    .create_event(chat, &pending.name, &format_event_date(&instant), &pending.description)
                    .await
            }
            Err(e) => Err(e),
        };

        match created {
            Ok(event) => {
                self.link_creator(key.user, &event).await;
                #[cfg(feature = "prometheus")]
                countdown_prometheus::record_event_created("interactive");
                info!(
                    chat_id = %chat,
                    user_id = %key.user,
                    event_name = %event.name,
                    date = %event.date,
                    "event created via picker"
                );
                self.show(
                    chat,
                    target,
                    Reply::html(messages::created_interactive(&event.name, &event.date)),
                )
                .await
            }
            Err(e) => {
                if e.is_user_error() {
                    info!(chat_id = %chat, event_name = %pending.name, error = %e, "event rejected");
                } else {
                    error!(chat_id = %chat, event_name = %pending.name, error = %e, "failed to create event");
                }
                self.show(chat, target, Reply::plain(messages::creation_failed(&e)))
                    .await
            }
        }
    }

    /// Records the creator of an event. Failures are logged and swallowed.
    pub(crate) async fn link_creator(&self, user: UserId, event: &Event) {
        if let Err(e) = self
            .store
            .link_event_to_user(event.chat_id, user, event.id)
            .await
        {
            warn!(
                chat_id = %event.chat_id,
                user_id = %user,
                event_id = event.id,
                error = %e,
                "failed to link event to user"
            );
        }
    }

    /// A stale or forged keyboard carried a day before today. The session
    /// loses its date and hour and the calendar opens at the current month.
    async fn past_date(
        &self,
        key: ConversationKey,
        target: Option<&MessageId>,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), CountdownError> {
        let Some(pending) = self.tracker.update_pending(key, |pending| {
            pending.date = None;
            pending.hour = None;
        }) else {
            return self.session_expired(key.chat, target).await;
        };
        debug!(chat_id = %key.chat, user_id = %key.user, %date, "past date pressed");
        self.show(
            key.chat,
            target,
            self.calendar_reply(&pending.name, YearMonth::of(today), today),
        )
        .await
    }

    async fn session_expired(
        &self,
        chat: ChatId,
        target: Option<&MessageId>,
    ) -> Result<(), CountdownError> {
        debug!(chat_id = %chat, "button pressed without a session");
        self.show(chat, target, Reply::plain(messages::session_expired()))
            .await
    }

    /// Edits the keyboard message in place when known, else sends a new one.
    async fn show(
        &self,
        chat: ChatId,
        target: Option<&MessageId>,
        reply: Reply,
    ) -> Result<(), CountdownError> {
        match target {
            Some(message_id) => self.transport.edit_message(chat, message_id, reply).await,
            None => self.transport.send_message(chat, reply).await.map(|_| ()),
        }
    }

    fn calendar_reply(&self, name: &str, month: YearMonth, today: NaiveDate) -> Reply {
        Reply::html(messages::calendar_prompt(name)).with_keyboard(build_calendar(month, today))
    }
}

fn hour_reply(name: &str, date: NaiveDate) -> Reply {
    Reply::html(messages::hour_prompt(name, date)).with_keyboard(build_hour_picker(date))
}

fn minute_reply(name: &str, date: NaiveDate, hour: u32) -> Reply {
    Reply::html(messages::minute_prompt(name, date, hour))
        .with_keyboard(build_minute_picker(date, hour))
}

/// Splits `name rest of text` into the name and a trimmed description.
fn split_name(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_config::model::StorageConfig;
    use countdown_storage::SqliteEventStore;
    use countdown_test_utils::{FixedClock, MockTransport, Outbound};
    use tracing_test::traced_test;

    struct Fixture {
        controller: ConversationController,
        store: Arc<SqliteEventStore>,
        transport: Arc<MockTransport>,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteEventStore::new(StorageConfig {
            database_path: dir.path().join("controller.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        store.initialize().await.unwrap();
        let transport = Arc::new(MockTransport::new());
        let controller = ConversationController::new(
            store.clone(),
            transport.clone(),
            Arc::new(ConversationTracker::new(None)),
            Arc::new(FixedClock::at(2025, 9, 1, 10, 0)),
        );
        Fixture {
            controller,
            store,
            transport,
            _dir: dir,
        }
    }

    fn press(payload: &str) -> IncomingCallback {
        IncomingCallback {
            callback_id: "cb".into(),
            chat_id: ChatId(1),
            user_id: UserId(2),
            message_id: None,
            payload: payload.into(),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn commit_without_message_id_sends_confirmation() {
        let f = fixture().await;
        f.controller
            .begin_with_name(ChatId(1), UserId(2), "standup", "")
            .await
            .unwrap();
        f.controller
            .handle_callback(&press("cal:min:2025-09-02:9:0"))
            .await
            .unwrap();

        let event = f.store.get_event(ChatId(1), "standup").await.unwrap();
        assert_eq!(event.date, "2025-09-02 09:00");
        assert!(matches!(
            f.transport.outbound().await.last(),
            Some(Outbound::Sent { .. })
        ));
        assert!(logs_contain("event created via picker"));
    }

    #[tokio::test]
    async fn callback_is_acknowledged_when_reply_fails() {
        let f = fixture().await;
        f.transport.set_fail_sends(true);

        let result = f.controller.handle_callback(&press("cal:cancel")).await;

        assert!(matches!(result, Err(CountdownError::Channel { .. })));
        assert_eq!(f.transport.answered().await, vec!["cb".to_string()]);
    }

    #[test]
    fn split_name_takes_first_token() {
        assert_eq!(split_name("meeting Q1 review"), ("meeting", "Q1 review"));
        assert_eq!(split_name("solo"), ("solo", ""));
        assert_eq!(split_name("trip \t to  the sea "), ("trip", "to  the sea"));
    }
}
