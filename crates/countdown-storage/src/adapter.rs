// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`EventStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use countdown_config::model::StorageConfig;
use countdown_core::{
    AdapterType, ChatId, CountdownError, Event, EventStatus, EventStore, HealthStatus,
    PluginAdapter, UserId,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed event store.
///
/// The database is opened lazily by [`EventStore::initialize`]; every other
/// call fails with a storage error until then.
pub struct SqliteEventStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteEventStore {
    /// Create a store for the configured path. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, CountdownError> {
        self.db.get().ok_or_else(|| CountdownError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Events `user` created in `chat`, oldest link first.
    pub async fn events_for_user(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> Result<Vec<Event>, CountdownError> {
        let db = self.db()?;
        let ids = queries::user_events::events_for_user(db, chat, user).await?;
        let events = queries::events::list_events(db, chat).await?;
        Ok(ids
            .iter()
            .filter_map(|id| events.iter().find(|event| event.id == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl PluginAdapter for SqliteEventStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CountdownError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CountdownError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn initialize(&self) -> Result<(), CountdownError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| CountdownError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite event store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CountdownError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn create_event(
        &self,
        chat: ChatId,
        name: &str,
        date: &str,
        description: &str,
    ) -> Result<Event, CountdownError> {
        let event = queries::events::create_event(self.db()?, chat, name, date, description).await?;
        debug!(chat_id = %chat, event_name = name, event_id = event.id, "event created");
        Ok(event)
    }

    async fn get_event(&self, chat: ChatId, name: &str) -> Result<Event, CountdownError> {
        queries::events::get_event(self.db()?, chat, name)
            .await?
            .ok_or_else(|| CountdownError::NotFound(name.to_string()))
    }

    async fn list_events(&self, chat: ChatId) -> Result<Vec<Event>, CountdownError> {
        queries::events::list_events(self.db()?, chat).await
    }

    async fn find_event_across_chats(
        &self,
        name: &str,
        exclude: ChatId,
        prefer: Option<ChatId>,
    ) -> Result<(Event, ChatId), CountdownError> {
        queries::events::find_event_across_chats(self.db()?, name, exclude, prefer)
            .await?
            .map(|event| {
                let chat = event.chat_id;
                (event, chat)
            })
            .ok_or_else(|| CountdownError::NotFound(name.to_string()))
    }

    async fn update_event_status(
        &self,
        chat: ChatId,
        name: &str,
        status: EventStatus,
    ) -> Result<(), CountdownError> {
        let changed = queries::events::update_event_status(self.db()?, chat, name, status).await?;
        if changed == 0 {
            return Err(CountdownError::NotFound(name.to_string()));
        }
        debug!(chat_id = %chat, event_name = name, %status, "event status updated");
        Ok(())
    }

    async fn link_event_to_user(
        &self,
        chat: ChatId,
        user: UserId,
        event_id: i64,
    ) -> Result<(), CountdownError> {
        queries::user_events::link_event_to_user(self.db()?, chat, user, event_id).await
    }
}
