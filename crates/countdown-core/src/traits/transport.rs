// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transport contract (Telegram, test mocks).

use async_trait::async_trait;

use crate::error::CountdownError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, MessageId, Reply};

/// Outbound side of a messaging platform.
///
/// Inbound updates are pushed into the router by the transport's own
/// dispatcher, so only the calls the core makes are modelled here.
#[async_trait]
pub trait ChatTransport: PluginAdapter {
    /// Sends a new message and returns its platform id.
    async fn send_message(&self, chat: ChatId, reply: Reply) -> Result<MessageId, CountdownError>;

    /// Replaces the text and keyboard of an existing message.
    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: &MessageId,
        reply: Reply,
    ) -> Result<(), CountdownError>;

    /// Acknowledges a button press, clearing the client's pending indicator.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), CountdownError>;
}
