// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Links between users and the events they created.

use countdown_core::{ChatId, CountdownError, UserId};
use rusqlite::params;

use crate::database::Database;

/// Record that `user` created `event_id` in `chat`. Duplicate links are ignored.
pub async fn link_event_to_user(
    db: &Database,
    chat: ChatId,
    user: UserId,
    event_id: i64,
) -> Result<(), CountdownError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO user_events (chat_id, user_id, event_id)
                 VALUES (?1, ?2, ?3)",
                params![chat.0, user.0, event_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Event ids linked to a user in a chat, oldest first.
pub async fn events_for_user(
    db: &Database,
    chat: ChatId,
    user: UserId,
) -> Result<Vec<i64>, CountdownError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT event_id FROM user_events
                 WHERE chat_id = ?1 AND user_id = ?2 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![chat.0, user.0], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
