// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation state for the interactive date picker.
//!
//! Each `(chat, user)` pair owns at most one slot: either an
//! "awaiting name" prompt or a [`PendingEvent`]. Setting one replaces the
//! other. Every operation is atomic per key (DashMap shard locks) and no lock
//! is held across an await point. Nothing is persisted; a restart forgets all
//! in-flight conversations.

use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::time::Instant;

use countdown_config::model::ConversationConfig;
use countdown_core::{ChatId, UserId};

/// Identity of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat: ChatId,
    pub user: UserId,
}

impl ConversationKey {
    pub fn new(chat: ChatId, user: UserId) -> Self {
        Self { chat, user }
    }
}

/// An event under interactive construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvent {
    pub name: String,
    pub description: String,
    /// Set once a day is chosen.
    pub date: Option<NaiveDate>,
    /// Set once an hour is chosen.
    pub hour: Option<u32>,
}

impl PendingEvent {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            date: None,
            hour: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Slot {
    AwaitingName,
    Pending(PendingEvent),
}

#[derive(Debug)]
struct Entry {
    slot: Slot,
    touched: Instant,
}

impl Entry {
    fn new(slot: Slot) -> Self {
        Self {
            slot,
            touched: Instant::now(),
        }
    }
}

/// Per-`(chat, user)` conversation slots with optional idle expiry.
#[derive(Debug, Default)]
pub struct ConversationTracker {
    slots: DashMap<ConversationKey, Entry>,
    ttl: Option<Duration>,
}

impl ConversationTracker {
    /// Slots idle for `ttl` are treated as absent. `None` never expires.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            slots: DashMap::new(),
            ttl,
        }
    }

    /// Builds a tracker from a TTL in seconds, where `0` disables expiry.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self::new((ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)))
    }

    pub fn from_config(config: &ConversationConfig) -> Self {
        Self::with_ttl_secs(config.ttl_secs)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.touched.elapsed() >= ttl)
    }

    /// Runs `f` on the live entry for `key`, dropping it first if expired.
    fn with_live<R>(&self, key: ConversationKey, f: impl FnOnce(&mut Entry) -> R) -> Option<R> {
        let mut expired = false;
        let result = match self.slots.get_mut(&key) {
            Some(mut entry) if !self.is_expired(&entry) => Some(f(&mut entry)),
            Some(_) => {
                expired = true;
                None
            }
            None => None,
        };
        if expired {
            self.slots.remove_if(&key, |_, entry| self.is_expired(entry));
        }
        result
    }

    /// Starts (or restarts) a picker session. Replaces any existing slot.
    pub fn set_pending(&self, key: ConversationKey, pending: PendingEvent) {
        self.slots.insert(key, Entry::new(Slot::Pending(pending)));
    }

    /// A copy of the live pending event, if any.
    pub fn get_pending(&self, key: ConversationKey) -> Option<PendingEvent> {
        self.with_live(key, |entry| match &entry.slot {
            Slot::Pending(pending) => Some(pending.clone()),
            Slot::AwaitingName => None,
        })
        .flatten()
    }

    /// Applies `f` to the live pending event and returns the updated copy.
    pub fn update_pending(
        &self,
        key: ConversationKey,
        f: impl FnOnce(&mut PendingEvent),
    ) -> Option<PendingEvent> {
        self.with_live(key, |entry| match &mut entry.slot {
            Slot::Pending(pending) => {
                f(pending);
                entry.touched = Instant::now();
                Some(pending.clone())
            }
            Slot::AwaitingName => None,
        })
        .flatten()
    }

    /// Removes and returns the live pending event.
    pub fn take_pending(&self, key: ConversationKey) -> Option<PendingEvent> {
        let (_, entry) = self
            .slots
            .remove_if(&key, |_, entry| matches!(entry.slot, Slot::Pending(_)))?;
        if self.is_expired(&entry) {
            return None;
        }
        match entry.slot {
            Slot::Pending(pending) => Some(pending),
            Slot::AwaitingName => None,
        }
    }

    /// Drops the pending event. Returns whether a live one existed.
    pub fn delete_pending(&self, key: ConversationKey) -> bool {
        self.take_pending(key).is_some()
    }

    /// Marks the user as about to type an event name. Replaces any existing slot.
    pub fn set_awaiting_name(&self, key: ConversationKey) {
        self.slots.insert(key, Entry::new(Slot::AwaitingName));
    }

    pub fn is_awaiting_name(&self, key: ConversationKey) -> bool {
        self.with_live(key, |entry| matches!(entry.slot, Slot::AwaitingName))
            .unwrap_or(false)
    }

    /// Clears the awaiting-name flag. Returns whether a live flag existed.
    pub fn clear_awaiting_name(&self, key: ConversationKey) -> bool {
        self.slots
            .remove_if(&key, |_, entry| matches!(entry.slot, Slot::AwaitingName))
            .is_some_and(|(_, entry)| !self.is_expired(&entry))
    }

    /// Drops whatever slot exists. Returns whether it was live.
    pub fn clear(&self, key: ConversationKey) -> bool {
        self.slots
            .remove(&key)
            .is_some_and(|(_, entry)| !self.is_expired(&entry))
    }

    /// Removes every expired slot and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, entry| !self.is_expired(entry));
        before.saturating_sub(self.slots.len())
    }

    /// Number of stored slots, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
