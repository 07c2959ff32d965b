// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event store contract.

use async_trait::async_trait;

use crate::error::CountdownError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, Event, EventStatus, UserId};

/// Durable storage of events keyed by `(chat, name)`.
///
/// Callers validate event names before [`create_event`](Self::create_event);
/// the store only enforces uniqueness.
#[async_trait]
pub trait EventStore: PluginAdapter {
    /// Opens the backing store and applies migrations.
    async fn initialize(&self) -> Result<(), CountdownError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), CountdownError>;

    /// Inserts a new active event. Fails with `DuplicateName` when the chat
    /// already has an event with this name.
    async fn create_event(
        &self,
        chat: ChatId,
        name: &str,
        date: &str,
        description: &str,
    ) -> Result<Event, CountdownError>;

    /// Fetches one event. Fails with `NotFound` on a miss.
    async fn get_event(&self, chat: ChatId, name: &str) -> Result<Event, CountdownError>;

    /// All events of a chat in creation order.
    async fn list_events(&self, chat: ChatId) -> Result<Vec<Event>, CountdownError>;

    /// Finds an event with this name in any chat other than `exclude`.
    ///
    /// When `prefer` is set (and differs from `exclude`) that chat is
    /// searched first; remaining chats follow in creation order.
    async fn find_event_across_chats(
        &self,
        name: &str,
        exclude: ChatId,
        prefer: Option<ChatId>,
    ) -> Result<(Event, ChatId), CountdownError>;

    /// Sets the status of an event. Fails with `NotFound` if it does not exist.
    async fn update_event_status(
        &self,
        chat: ChatId,
        name: &str,
        status: EventStatus,
    ) -> Result<(), CountdownError>;

    /// Records that `user` created `event_id`. A duplicate link is a no-op.
    async fn link_event_to_user(
        &self,
        chat: ChatId,
        user: UserId,
        event_id: i64,
    ) -> Result<(), CountdownError>;
}
