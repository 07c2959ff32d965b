// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatches inbound updates to commands and the picker controller.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, info, warn};

use countdown_config::model::ChatsConfig;
use countdown_core::{
    ChatId, CountdownError, EventStatus, Inbound, IncomingText, Reply, TimeLeft, UserId,
    format_event_date, parse_event_date, validate_event_name,
};

use crate::command::{Command, parse_command};
use crate::controller::ConversationController;
use crate::messages::{self, ListKind};
use crate::state::ConversationKey;

/// Second `/set_date` token that carries a time of day.
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}$").expect("time token regex"));

/// Entry point for every inbound update.
pub struct CommandRouter {
    controller: ConversationController,
    fallback_chat: Option<ChatId>,
}

impl CommandRouter {
    /// `fallback_chat` is the shared chat merged into listings and searched
    /// first on lookup misses.
    pub fn new(controller: ConversationController, fallback_chat: Option<ChatId>) -> Self {
        Self {
            controller,
            fallback_chat,
        }
    }

    pub fn from_config(controller: ConversationController, chats: &ChatsConfig) -> Self {
        Self::new(controller, chats.fallback_chat_id.map(ChatId))
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn fallback_chat(&self) -> Option<ChatId> {
        self.fallback_chat
    }

    pub async fn handle(&self, inbound: Inbound) -> Result<(), CountdownError> {
        match inbound {
            Inbound::Text(message) => self.handle_text(&message).await,
            Inbound::Callback(callback) => self.controller.handle_callback(&callback).await,
        }
    }

    async fn handle_text(&self, message: &IncomingText) -> Result<(), CountdownError> {
        let chat = message.chat_id;
        let user = message.user_id;

        if self
            .controller
            .handle_free_text(chat, user, &message.text)
            .await?
        {
            return Ok(());
        }

        let Some(line) = parse_command(&message.text) else {
            return Ok(());
        };

        #[cfg(feature = "prometheus")]
        countdown_prometheus::record_command(line.command.label());
        debug!(chat_id = %chat, user_id = %user, command = line.command.label(), "command");

        match line.command {
            Command::SetDate => self.set_date(chat, user, &line.args).await,
            Command::List => self.list(chat, ListKind::All).await,
            Command::Active => self.list(chat, ListKind::Active).await,
            Command::Outdated => self.list(chat, ListKind::Outdated).await,
            Command::Help => self.send(chat, Reply::plain(messages::help_text())).await,
            Command::Cancel => self.cancel(chat, user).await,
            Command::Lookup(name) => self.lookup(chat, &name).await,
        }
    }

    async fn set_date(&self, chat: ChatId, user: UserId, args: &[&str]) -> Result<(), CountdownError> {
        match args {
            [] => self.controller.begin_awaiting_name(chat, user).await,
            [first, rest @ ..] if !first.starts_with(|c: char| c.is_ascii_digit()) => {
                self.controller
                    .begin_with_name(chat, user, first, &rest.join(" "))
                    .await
            }
            _ => self.create_direct(chat, user, args).await,
        }
    }

    /// `/set_date <date> [time] <name> [description...]`
    async fn create_direct(&self, chat: ChatId, user: UserId, args: &[&str]) -> Result<(), CountdownError> {
        let (date_text, rest) = match args {
            [date, time, rest @ ..] if TIME_TOKEN.is_match(time) => (format!("{date} {time}"), rest),
            [date, rest @ ..] => (date.to_string(), rest),
            [] => return self.send(chat, Reply::plain(messages::set_date_usage())).await,
        };
        let Some((name, description)) = rest.split_first() else {
            return self.send(chat, Reply::plain(messages::set_date_usage())).await;
        };

        let Ok(date) = parse_event_date(&date_text) else {
            debug!(chat_id = %chat, raw = %date_text, "unparseable date");
            return self.send(chat, Reply::plain(messages::invalid_date(&date_text))).await;
        };
        if let Err(e) = validate_event_name(name) {
            return self.send(chat, Reply::plain(e.to_string())).await;
        }

        let canonical = format_event_date(&date);
        match self
            .controller
            .store()
            .create_event(chat, name, &canonical, &description.join(" "))
            .await
        {
            Ok(event) => {
                self.controller.link_creator(user, &event).await;
                #[cfg(feature = "prometheus")]
                countdown_prometheus::record_event_created("direct");
                info!(
                    chat_id = %chat,
                    user_id = %user,
                    event_name = %event.name,
                    date = %event.date,
                    "event created"
                );
                self.send(chat, Reply::plain(messages::created_direct(&event.name, &event.date)))
                    .await
            }
            Err(e) => {
                if e.is_user_error() {
                    info!(chat_id = %chat, event_name = *name, error = %e, "event rejected");
                } else {
                    error!(chat_id = %chat, event_name = *name, error = %e, "failed to create event");
                }
                self.send(chat, Reply::plain(messages::creation_failed(&e)))
                    .await
            }
        }
    }

    /// Events of this chat followed by the fallback chat's, filtered by kind.
    async fn list(&self, chat: ChatId, kind: ListKind) -> Result<(), CountdownError> {
        let store = self.controller.store();
        let mut events = match store.list_events(chat).await {
            Ok(events) => events,
            Err(e) => return self.report_failure(chat, e).await,
        };

        if let Some(fallback) = self.fallback_chat.filter(|fallback| *fallback != chat) {
            match store.list_events(fallback).await {
                Ok(shared) => events.extend(shared),
                Err(e) => {
                    warn!(chat_id = %fallback, error = %e, "failed to list fallback chat events");
                }
            }
        }

        events.retain(|event| match kind {
            ListKind::All => true,
            ListKind::Active => event.status == EventStatus::Active,
            ListKind::Outdated => event.status == EventStatus::Outdated,
        });
        self.send(chat, Reply::plain(messages::event_list(kind, &events)))
            .await
    }

    async fn lookup(&self, chat: ChatId, name: &str) -> Result<(), CountdownError> {
        let store = self.controller.store();

        let (mut event, found_in) = match store.get_event(chat, name).await {
            Ok(event) => (event, None),
            Err(CountdownError::NotFound(_)) => {
                match store
                    .find_event_across_chats(name, chat, self.fallback_chat)
                    .await
                {
                    Ok((event, found)) => {
                        info!(event_name = name, found_in_chat_id = %found, "event found in another chat");
                        (event, Some(found))
                    }
                    Err(CountdownError::NotFound(_)) => {
                        debug!(chat_id = %chat, event_name = name, "event not found");
                        return self.send(chat, Reply::plain(messages::not_found(name))).await;
                    }
                    Err(e) => return self.report_failure(chat, e).await,
                }
            }
            Err(e) => return self.report_failure(chat, e).await,
        };

        let target = match parse_event_date(&event.date) {
            Ok(target) => target,
            Err(e) => {
                error!(event_name = %event.name, date = %event.date, error = %e, "stored date is unreadable");
                return self.send(chat, Reply::plain(messages::internal_error())).await;
            }
        };
        let left = TimeLeft::until(&self.controller.clock().now(), &target);

        if left.is_none() && event.status == EventStatus::Active {
            match store
                .update_event_status(event.chat_id, &event.name, EventStatus::Outdated)
                .await
            {
                Ok(()) => {
                    info!(chat_id = %event.chat_id, event_name = %event.name, "event marked outdated");
                    event.status = EventStatus::Outdated;
                }
                Err(e) => {
                    warn!(chat_id = %event.chat_id, event_name = %event.name, error = %e, "failed to mark event outdated");
                }
            }
        }

        self.send(chat, Reply::plain(messages::event_details(&event, left, found_in)))
            .await
    }

    async fn cancel(&self, chat: ChatId, user: UserId) -> Result<(), CountdownError> {
        let text = if self
            .controller
            .tracker()
            .clear(ConversationKey::new(chat, user))
        {
            messages::cancelled()
        } else {
            messages::nothing_to_cancel()
        };
        self.send(chat, Reply::plain(text)).await
    }

    async fn report_failure(&self, chat: ChatId, err: CountdownError) -> Result<(), CountdownError> {
        error!(chat_id = %chat, error = %err, "request failed");
        self.send(chat, Reply::plain(messages::user_error_text(&err)))
            .await
    }

    async fn send(&self, chat: ChatId, reply: Reply) -> Result<(), CountdownError> {
        self.controller
            .transport()
            .send_message(chat, reply)
            .await
            .map(|_| ())
    }
}
