//! Floor Plan Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{FloorPlan, FloorPlanUpdate, floor_plan};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "floor_plan";

#[derive(Clone)]
pub struct FloorPlanRepository {
    base: BaseRepository,
}

impl FloorPlanRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The account's floor plan, created lazily with the default canvas size
    pub async fn find_or_create(&self, account: &str) -> RepoResult<FloorPlan> {
        let rows: Vec<FloorPlan> = self
            .base
            .db()
            .query("SELECT * FROM floor_plan WHERE account = $account LIMIT 1")
            .bind(("account", account.to_string()))
            .await?
            .take(0)?;

        if let Some(plan) = rows.into_iter().next() {
            return Ok(plan);
        }

        let now = Utc::now();
        let plan = FloorPlan {
            id: None,
            account: account.to_string(),
            width: floor_plan::DEFAULT_WIDTH,
            height: floor_plan::DEFAULT_HEIGHT,
            background_image_url: None,
            created_at: now,
            updated_at: now,
        };
        let created: Option<FloorPlan> = self.base.db().create(TABLE).content(plan).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create floor plan".to_string()))
    }

    /// Update canvas size and/or background image
    pub async fn update(&self, account: &str, data: FloorPlanUpdate) -> RepoResult<FloorPlan> {
        let existing = self.find_or_create(account).await?;
        let id = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Floor plan missing id".to_string()))?;

        let updated = FloorPlan {
            id: Some(id.clone()),
            account: existing.account,
            width: data.width.unwrap_or(existing.width),
            height: data.height.unwrap_or(existing.height),
            // Absent keeps the stored image, explicit null clears it
            background_image_url: match data.background_image_url {
                Some(value) => value,
                None => existing.background_image_url,
            },
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        let saved: Option<FloorPlan> = self.base.db().update(id).content(updated).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to update floor plan".to_string()))
    }
}
