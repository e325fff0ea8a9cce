//! Wedding Settings Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{WeddingSettings, WeddingSettingsUpsert};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "wedding_settings";

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the account's settings row, if any
    pub async fn find_by_account(&self, account: &str) -> RepoResult<Option<WeddingSettings>> {
        let rows: Vec<WeddingSettings> = self
            .base
            .db()
            .query("SELECT * FROM wedding_settings WHERE account = $account LIMIT 1")
            .bind(("account", account.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Create on first save, update thereafter — at most one row per account
    pub async fn upsert(
        &self,
        account: &str,
        data: WeddingSettingsUpsert,
    ) -> RepoResult<WeddingSettings> {
        let now = Utc::now();

        if let Some(existing) = self.find_by_account(account).await? {
            let id = existing
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("Settings row missing id".to_string()))?;
            let updated = WeddingSettings {
                id: Some(id.clone()),
                account: account.to_string(),
                couple_names: data.couple_names,
                wedding_date: data.wedding_date,
                wedding_time: data.wedding_time,
                venue_name: data.venue_name,
                venue_address: data.venue_address,
                // Absent keeps the stored image, explicit null clears it
                invitation_image_url: match data.invitation_image_url {
                    Some(value) => value,
                    None => existing.invitation_image_url,
                },
                created_at: existing.created_at,
                updated_at: now,
            };
            let saved: Option<WeddingSettings> =
                self.base.db().update(id).content(updated).await?;
            saved.ok_or_else(|| RepoError::Database("Failed to update settings".to_string()))
        } else {
            let settings = WeddingSettings {
                id: None,
                account: account.to_string(),
                couple_names: data.couple_names,
                wedding_date: data.wedding_date,
                wedding_time: data.wedding_time,
                venue_name: data.venue_name,
                venue_address: data.venue_address,
                invitation_image_url: data.invitation_image_url.flatten(),
                created_at: now,
                updated_at: now,
            };
            let created: Option<WeddingSettings> =
                self.base.db().create(TABLE).content(settings).await?;
            created.ok_or_else(|| RepoError::Database("Failed to create settings".to_string()))
        }
    }
}
