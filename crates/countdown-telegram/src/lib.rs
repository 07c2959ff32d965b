// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for the countdown bot.
//!
//! [`TelegramTransport`] implements [`ChatTransport`] on top of the Bot API
//! via teloxide, and [`run`] long-polls for updates and hands every message
//! and button press to the [`CommandRouter`].

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, CallbackQueryId, ParseMode};
use teloxide::{ApiError, RequestError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use countdown_agent::{CommandRouter, bot_commands};
use countdown_config::model::TelegramConfig;
use countdown_core::{
    AdapterType, ChatTransport, CountdownError, HealthStatus, MessageId, PluginAdapter, Reply,
    TextFormat,
};

/// Telegram Bot API transport.
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Creates the transport. Requires `telegram.bot_token`.
    pub fn new(config: &TelegramConfig) -> Result<Self, CountdownError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            CountdownError::Config("telegram.bot_token is required to run the bot".into())
        })?;

        if token.trim().is_empty() {
            return Err(CountdownError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Publishes the fixed command menu shown by Telegram clients.
    pub async fn register_commands(&self) -> Result<(), CountdownError> {
        let commands: Vec<BotCommand> = bot_commands()
            .into_iter()
            .map(|(command, description)| BotCommand::new(command, description))
            .collect();
        let count = commands.len();

        self.bot
            .set_my_commands(commands)
            .await
            .map_err(|e| channel_error("failed to register bot commands", e))?;
        info!(count, "bot commands registered");
        Ok(())
    }
}

fn channel_error(context: &str, e: RequestError) -> CountdownError {
    CountdownError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Telegram rejects an edit that would leave the message unchanged.
fn is_not_modified(e: &RequestError) -> bool {
    matches!(e, RequestError::Api(ApiError::MessageNotModified))
}

fn to_chat_id(chat: countdown_core::ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat.0)
}

fn to_message_id(message_id: &MessageId) -> Result<teloxide::types::MessageId, CountdownError> {
    message_id
        .0
        .parse::<i32>()
        .map(teloxide::types::MessageId)
        .map_err(|e| CountdownError::Channel {
            message: format!("invalid message_id '{}': {e}", message_id.0),
            source: None,
        })
}

#[async_trait]
impl PluginAdapter for TelegramTransport {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, CountdownError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), CountdownError> {
        debug!("Telegram transport shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat: countdown_core::ChatId,
        reply: Reply,
    ) -> Result<MessageId, CountdownError> {
        let Reply {
            text,
            format,
            keyboard,
        } = reply;

        let mut request = self.bot.send_message(to_chat_id(chat), text);
        if format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(handler::to_inline_markup(&keyboard));
        }

        let sent = request
            .await
            .map_err(|e| channel_error("failed to send message", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn edit_message(
        &self,
        chat: countdown_core::ChatId,
        message_id: &MessageId,
        reply: Reply,
    ) -> Result<(), CountdownError> {
        let Reply {
            text,
            format,
            keyboard,
        } = reply;

        let mut request = self
            .bot
            .edit_message_text(to_chat_id(chat), to_message_id(message_id)?, text);
        if format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(handler::to_inline_markup(&keyboard));
        }

        match request.await {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => {
                debug!(chat_id = %chat, "edit skipped, message unchanged");
                Ok(())
            }
            Err(e) => Err(channel_error("failed to edit message", e)),
        }
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), CountdownError> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_owned()))
            .await
            .map_err(|e| channel_error("failed to answer callback query", e))?;
        Ok(())
    }
}

/// Long-polls Telegram and routes updates until `cancel` fires.
///
/// Updates are processed concurrently across chats. Handler failures are
/// logged and never stop the dispatcher.
pub async fn run(bot: Bot, router: Arc<CommandRouter>, cancel: CancellationToken) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handler::on_message))
        .branch(Update::filter_callback_query().endpoint(handler::on_callback));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|_| async {})
        .build();

    let shutdown = dispatcher.shutdown_token();
    tokio::spawn(async move {
        cancel.cancelled().await;
        match shutdown.shutdown() {
            Ok(stopped) => {
                stopped.await;
                debug!("Telegram dispatcher stopped");
            }
            Err(_) => debug!("Telegram dispatcher was not running"),
        }
    });

    info!("starting Telegram long polling");
    dispatcher.dispatch().await;
    info!("Telegram long polling stopped");
}
