// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat transport for deterministic testing.
//!
//! `MockTransport` implements `ChatTransport` and records every outbound
//! message, edit and callback acknowledgement for assertions.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use countdown_core::{
    AdapterType, ChatId, ChatTransport, CountdownError, HealthStatus, MessageId, PluginAdapter,
    Reply,
};

/// One captured outbound operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Sent {
        chat: ChatId,
        message_id: MessageId,
        reply: Reply,
    },
    Edited {
        chat: ChatId,
        message_id: MessageId,
        reply: Reply,
    },
}

impl Outbound {
    pub fn chat(&self) -> ChatId {
        match self {
            Outbound::Sent { chat, .. } | Outbound::Edited { chat, .. } => *chat,
        }
    }

    pub fn reply(&self) -> &Reply {
        match self {
            Outbound::Sent { reply, .. } | Outbound::Edited { reply, .. } => reply,
        }
    }

    pub fn message_id(&self) -> &MessageId {
        match self {
            Outbound::Sent { message_id, .. } | Outbound::Edited { message_id, .. } => message_id,
        }
    }
}

/// A mock chat transport for testing.
#[derive(Debug, Default)]
pub struct MockTransport {
    outbound: Mutex<Vec<Outbound>>,
    answered: Mutex<Vec<String>>,
    next_id: AtomicU64,
    fail_sends: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends and edits fail with a channel error.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Every send and edit, in order.
    pub async fn outbound(&self) -> Vec<Outbound> {
        self.outbound.lock().await.clone()
    }

    /// The reply carried by the most recent send or edit.
    pub async fn last_reply(&self) -> Option<Reply> {
        self.outbound
            .lock()
            .await
            .last()
            .map(|out| out.reply().clone())
    }

    /// Id of the most recently sent (not edited) message.
    pub async fn last_sent_id(&self) -> Option<MessageId> {
        self.outbound
            .lock()
            .await
            .iter()
            .rev()
            .find_map(|out| match out {
                Outbound::Sent { message_id, .. } => Some(message_id.clone()),
                Outbound::Edited { .. } => None,
            })
    }

    /// Callback ids acknowledged so far.
    pub async fn answered(&self) -> Vec<String> {
        self.answered.lock().await.clone()
    }

    pub async fn outbound_count(&self) -> usize {
        self.outbound.lock().await.len()
    }

    pub async fn clear(&self) {
        self.outbound.lock().await.clear();
        self.answered.lock().await.clear();
    }

    fn check_failing(&self) -> Result<(), CountdownError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(CountdownError::Channel {
                message: "mock transport is failing".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, CountdownError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CountdownError> {
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(&self, chat: ChatId, reply: Reply) -> Result<MessageId, CountdownError> {
        self.check_failing()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = MessageId(format!("mock-msg-{id}"));
        self.outbound.lock().await.push(Outbound::Sent {
            chat,
            message_id: message_id.clone(),
            reply,
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: &MessageId,
        reply: Reply,
    ) -> Result<(), CountdownError> {
        self.check_failing()?;
        self.outbound.lock().await.push(Outbound::Edited {
            chat,
            message_id: message_id.clone(),
            reply,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), CountdownError> {
        self.answered.lock().await.push(callback_id.to_string());
        Ok(())
    }
}
