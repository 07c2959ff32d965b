// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event CRUD operations.

use std::str::FromStr;

use countdown_core::{ChatId, CountdownError, Event, EventStatus};
use rusqlite::{ErrorCode, Row, params};

use crate::database::Database;

const EVENT_COLUMNS: &str = "id, chat_id, name, date, description, status, created_at";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let status: String = row.get(5)?;
    let status = EventStatus::from_str(&status).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Event {
        id: row.get(0)?,
        chat_id: ChatId(row.get(1)?),
        name: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        status,
        created_at: row.get(6)?,
    })
}

/// Insert a new active event and return the stored row.
pub async fn create_event(
    db: &Database,
    chat: ChatId,
    name: &str,
    date: &str,
    description: &str,
) -> Result<Event, CountdownError> {
    let (name, date, description) = (name.to_string(), date.to_string(), description.to_string());
    let duplicate_name = name.clone();

    let created = db
        .connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO events (chat_id, name, date, description, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    chat.0,
                    name,
                    date,
                    description,
                    EventStatus::Active.to_string()
                ],
            );
            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation
                        && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
            let id = conn.last_insert_rowid();
            let event = conn.query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![id],
                event_from_row,
            )?;
            Ok(Some(event))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    created.ok_or(CountdownError::DuplicateName {
        name: duplicate_name,
    })
}

/// Get an event by chat and name.
pub async fn get_event(
    db: &Database,
    chat: ChatId,
    name: &str,
) -> Result<Option<Event>, CountdownError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE chat_id = ?1 AND name = ?2"),
                params![chat.0, name],
                event_from_row,
            );
            match result {
                Ok(event) => Ok(Some(event)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a chat's events in creation order.
pub async fn list_events(db: &Database, chat: ChatId) -> Result<Vec<Event>, CountdownError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events
                 WHERE chat_id = ?1
                 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![chat.0], event_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find an event by name outside `exclude`, trying `prefer` first.
pub async fn find_event_across_chats(
    db: &Database,
    name: &str,
    exclude: ChatId,
    prefer: Option<ChatId>,
) -> Result<Option<Event>, CountdownError> {
    let name = name.to_string();
    let prefer = prefer.map(|c| c.0);
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!(
                    "SELECT {EVENT_COLUMNS} FROM events
                     WHERE name = ?1 AND chat_id != ?2
                     ORDER BY CASE WHEN chat_id = ?3 THEN 0 ELSE 1 END, id
                     LIMIT 1"
                ),
                params![name, exclude.0, prefer],
                event_from_row,
            );
            match result {
                Ok(event) => Ok(Some(event)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set an event's status. Returns the number of rows changed (0 or 1).
pub async fn update_event_status(
    db: &Database,
    chat: ChatId,
    name: &str,
    status: EventStatus,
) -> Result<usize, CountdownError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE events SET status = ?1 WHERE chat_id = ?2 AND name = ?3",
                params![status.to_string(), chat.0, name],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
