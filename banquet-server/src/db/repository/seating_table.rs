//! Seating Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{SeatingTable, SeatingTableCreate, SeatingTableUpdate, TableShape};
use crate::seating::geometry::{clamp_percent, round_i64};
use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "seating_table";

#[derive(Clone)]
pub struct SeatingTableRepository {
    base: BaseRepository,
}

impl SeatingTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All tables on a floor plan, oldest first (placement order)
    pub async fn find_by_plan(&self, floor_plan: &RecordId) -> RepoResult<Vec<SeatingTable>> {
        let tables: Vec<SeatingTable> = self
            .base
            .db()
            .query("SELECT * FROM seating_table WHERE floor_plan = $plan ORDER BY created_at")
            .bind(("plan", floor_plan.to_string()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// One table by id, scoped to the floor plan
    pub async fn find_by_id_in_plan(
        &self,
        floor_plan: &RecordId,
        id: &str,
    ) -> RepoResult<Option<SeatingTable>> {
        let record = self.base.parse_id(id, TABLE)?;
        let tables: Vec<SeatingTable> = self
            .base
            .db()
            .query("SELECT * FROM seating_table WHERE id = $id AND floor_plan = $plan")
            .bind(("id", record))
            .bind(("plan", floor_plan.to_string()))
            .await?
            .take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Place a new table, applying shape-dependent defaults and rounding all
    /// numeric input to integers
    pub async fn create(
        &self,
        floor_plan: &RecordId,
        data: SeatingTableCreate,
    ) -> RepoResult<SeatingTable> {
        let shape = data.shape.unwrap_or(TableShape::Round);
        let now = Utc::now();

        let table = SeatingTable {
            id: None,
            floor_plan: floor_plan.clone(),
            name: data.name,
            shape,
            capacity: data
                .capacity
                .map(round_i64)
                .unwrap_or_else(|| shape.default_capacity()),
            position_x: clamp_percent(data.position_x.unwrap_or(10.0)),
            position_y: clamp_percent(data.position_y.unwrap_or(10.0)),
            width: data
                .width
                .map(round_i64)
                .unwrap_or_else(|| shape.default_width()),
            height: data
                .height
                .map(round_i64)
                .unwrap_or_else(|| shape.default_height()),
            rotation: data.rotation.map(round_i64).unwrap_or(0),
            created_at: now,
            updated_at: now,
        };

        let created: Option<SeatingTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
    }

    /// Update a table; positions are clamped to the drag range and every
    /// numeric field is committed as a rounded integer
    pub async fn update(
        &self,
        floor_plan: &RecordId,
        data: SeatingTableUpdate,
    ) -> RepoResult<SeatingTable> {
        let existing = self
            .find_by_id_in_plan(floor_plan, &data.id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", data.id)))?;
        let id = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table row missing id".to_string()))?;

        let updated = SeatingTable {
            id: Some(id.clone()),
            floor_plan: existing.floor_plan,
            name: data.name.unwrap_or(existing.name),
            shape: data.shape.unwrap_or(existing.shape),
            capacity: data.capacity.map(round_i64).unwrap_or(existing.capacity),
            position_x: data
                .position_x
                .map(clamp_percent)
                .unwrap_or(existing.position_x),
            position_y: data
                .position_y
                .map(clamp_percent)
                .unwrap_or(existing.position_y),
            width: data.width.map(round_i64).unwrap_or(existing.width),
            height: data.height.map(round_i64).unwrap_or(existing.height),
            rotation: data.rotation.map(round_i64).unwrap_or(existing.rotation),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        let saved: Option<SeatingTable> = self.base.db().update(id).content(updated).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to update table".to_string()))
    }

    /// Remove a table and any assignments pointing at it
    pub async fn delete(&self, floor_plan: &RecordId, id: &str) -> RepoResult<bool> {
        let existing = self.find_by_id_in_plan(floor_plan, id).await?;
        let Some(table) = existing else {
            return Ok(false);
        };
        let record = table
            .id
            .ok_or_else(|| RepoError::Database("Table row missing id".to_string()))?;

        // The assignment link column holds the string form of the table id
        self.base
            .db()
            .query("DELETE table_assignment WHERE table_id = $tid")
            .query("DELETE $table")
            .bind(("tid", record.to_string()))
            .bind(("table", record))
            .await?
            .check()?;

        Ok(true)
    }
}
