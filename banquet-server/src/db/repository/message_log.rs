//! Message Delivery Log Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::{MessageLog, MessageStatus, MessageType};
use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "message_log";

#[derive(Clone)]
pub struct MessageLogRepository {
    base: BaseRepository,
}

impl MessageLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a delivery attempt result
    pub async fn insert(
        &self,
        account: &str,
        guest: &RecordId,
        message_type: MessageType,
        status: MessageStatus,
        provider_message_id: Option<String>,
        error_message: Option<String>,
    ) -> RepoResult<MessageLog> {
        let now = Utc::now();
        let sent_at = matches!(status, MessageStatus::Sent | MessageStatus::Delivered)
            .then_some(now);
        let log = MessageLog {
            id: None,
            account: account.to_string(),
            guest: guest.clone(),
            message_type,
            status,
            provider_message_id,
            error_message,
            sent_at,
            created_at: now,
        };
        let created: Option<MessageLog> = self.base.db().create(TABLE).content(log).await?;
        created.ok_or_else(|| {
            super::RepoError::Database("Failed to insert message log".to_string())
        })
    }

    /// Most recent delivery attempts for an account, newest first
    pub async fn find_recent(&self, account: &str, limit: i64) -> RepoResult<Vec<MessageLog>> {
        let rows: Vec<MessageLog> = self
            .base
            .db()
            .query("SELECT * FROM message_log WHERE account = $account ORDER BY created_at DESC LIMIT $limit")
            .bind(("account", account.to_string()))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(rows)
    }
}
