// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between teloxide updates and transport-neutral types, and the
//! dispatcher endpoints that feed the [`CommandRouter`].

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::{debug, error, warn};

use countdown_agent::CommandRouter;
use countdown_core::{Inbound, IncomingCallback, IncomingText, Keyboard};

/// Converts a text message. Messages without a sender or without text yield `None`.
pub fn to_incoming_text(msg: &Message) -> Option<IncomingText> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(IncomingText {
        chat_id: countdown_core::ChatId(msg.chat.id.0),
        user_id: countdown_core::UserId(user.id.0 as i64),
        text: text.to_string(),
    })
}

/// Converts a button press. Presses without a source message or payload yield `None`.
pub fn to_incoming_callback(query: &CallbackQuery) -> Option<IncomingCallback> {
    let message = query.message.as_ref()?;
    let payload = query.data.clone()?;
    Some(IncomingCallback {
        callback_id: query.id.0.clone(),
        chat_id: countdown_core::ChatId(message.chat().id.0),
        user_id: countdown_core::UserId(query.from.id.0 as i64),
        message_id: Some(countdown_core::MessageId(message.id().0.to_string())),
        payload,
    })
}

/// Renders a keyboard as callback buttons.
pub fn to_inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.text.clone(), button.payload.clone()))
            .collect::<Vec<_>>()
    }))
}

pub(crate) async fn on_message(router: Arc<CommandRouter>, msg: Message) -> ResponseResult<()> {
    let Some(incoming) = to_incoming_text(&msg) else {
        debug!(chat_id = msg.chat.id.0, msg_id = msg.id.0, "ignoring message without text or sender");
        return respond(());
    };

    let chat_id = incoming.chat_id;
    if let Err(e) = router.handle(Inbound::Text(incoming)).await {
        error!(chat_id = %chat_id, error = %e, "failed to handle message");
    }
    respond(())
}

pub(crate) async fn on_callback(
    bot: Bot,
    router: Arc<CommandRouter>,
    query: CallbackQuery,
) -> ResponseResult<()> {
    match to_incoming_callback(&query) {
        Some(incoming) => {
            let chat_id = incoming.chat_id;
            if let Err(e) = router.handle(Inbound::Callback(incoming)).await {
                error!(chat_id = %chat_id, error = %e, "failed to handle callback");
            }
        }
        None => {
            debug!(callback_id = %query.id.0, "callback without message or data");
            if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                warn!(error = %e, "failed to acknowledge callback");
            }
        }
    }
    respond(())
}
