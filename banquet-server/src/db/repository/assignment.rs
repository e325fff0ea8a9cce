//! Table Assignment Repository
//!
//! Assignments are upserted by guest identity: a guest moved to another
//! table keeps exactly one active assignment. Two concurrent moves race on a
//! last-write-wins basis, which is the accepted model.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Rsvp, SeatingTable, TableAssignment};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "table_assignment";

/// Assignment row joined with guest and table names for the listing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    pub id: String,
    pub guest_id: String,
    pub table_id: String,
    pub guest_name: String,
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<i64>,
}

/// A guest currently seated at a table, with their RSVP if any —
/// the input to occupancy computation
#[derive(Debug, Clone)]
pub struct SeatedGuest {
    pub guest: RecordId,
    pub rsvp: Option<Rsvp>,
}

#[derive(Clone)]
pub struct AssignmentRepository {
    base: BaseRepository,
}

impl AssignmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All assignments for an account's guests, with names joined
    pub async fn find_all(&self, account: &str) -> RepoResult<Vec<AssignmentView>> {
        #[derive(Deserialize)]
        struct GuestRow {
            id: RecordId,
            first_name: String,
            #[serde(default)]
            last_name: Option<String>,
        }

        let guests: Vec<GuestRow> = self
            .base
            .db()
            .query("SELECT id, first_name, last_name FROM guest WHERE account = $account")
            .bind(("account", account.to_string()))
            .await?
            .take(0)?;

        if guests.is_empty() {
            return Ok(Vec::new());
        }
        // The guest link column holds the string form of the record id
        let guest_ids: Vec<String> = guests.iter().map(|g| g.id.to_string()).collect();

        let assignments: Vec<TableAssignment> = self
            .base
            .db()
            .query("SELECT * FROM table_assignment WHERE guest IN $ids")
            .bind(("ids", guest_ids))
            .await?
            .take(0)?;

        let table_ids: Vec<RecordId> = assignments.iter().map(|a| a.table_id.clone()).collect();
        let tables: Vec<SeatingTable> = if table_ids.is_empty() {
            Vec::new()
        } else {
            self.base
                .db()
                .query("SELECT * FROM seating_table WHERE id IN $ids")
                .bind(("ids", table_ids))
                .await?
                .take(0)?
        };

        let views = assignments
            .into_iter()
            .map(|a| {
                let guest_name = guests
                    .iter()
                    .find(|g| g.id == a.guest)
                    .map(|g| match &g.last_name {
                        Some(last) => format!("{} {}", g.first_name, last),
                        None => g.first_name.clone(),
                    })
                    .unwrap_or_default();
                let table_name = tables
                    .iter()
                    .find(|t| t.id.as_ref() == Some(&a.table_id))
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                AssignmentView {
                    id: a.id.map(|id| id.to_string()).unwrap_or_default(),
                    guest_id: a.guest.to_string(),
                    table_id: a.table_id.to_string(),
                    guest_name,
                    table_name,
                    seat_number: a.seat_number,
                }
            })
            .collect();

        Ok(views)
    }

    /// The guest's current assignment, if any
    pub async fn find_by_guest(&self, guest: &RecordId) -> RepoResult<Option<TableAssignment>> {
        let rows: Vec<TableAssignment> = self
            .base
            .db()
            .query("SELECT * FROM table_assignment WHERE guest = $guest LIMIT 1")
            .bind(("guest", guest.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Everyone currently seated at a table, with RSVPs joined
    pub async fn seated_at(&self, table: &RecordId) -> RepoResult<Vec<SeatedGuest>> {
        let assignments: Vec<TableAssignment> = self
            .base
            .db()
            .query("SELECT * FROM table_assignment WHERE table_id = $table")
            .bind(("table", table.to_string()))
            .await?
            .take(0)?;

        if assignments.is_empty() {
            return Ok(Vec::new());
        }
        let guest_ids: Vec<String> = assignments.iter().map(|a| a.guest.to_string()).collect();

        let rsvps: Vec<Rsvp> = self
            .base
            .db()
            .query("SELECT * FROM rsvp WHERE guest IN $ids")
            .bind(("ids", guest_ids))
            .await?
            .take(0)?;

        Ok(assignments
            .into_iter()
            .map(|a| SeatedGuest {
                rsvp: rsvps.iter().find(|r| r.guest == a.guest).cloned(),
                guest: a.guest,
            })
            .collect())
    }

    /// Assign (or move) a guest to a table — replaces any prior assignment
    pub async fn upsert(
        &self,
        guest: &RecordId,
        table: &RecordId,
    ) -> RepoResult<TableAssignment> {
        if let Some(existing) = self.find_by_guest(guest).await? {
            let id = existing
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("Assignment row missing id".to_string()))?;
            self.base
                .db()
                .query("UPDATE $id SET table_id = $table")
                .bind(("id", id.clone()))
                .bind(("table", table.to_string()))
                .await?
                .check()?;
            let updated: Option<TableAssignment> = self.base.db().select(id).await?;
            updated.ok_or_else(|| RepoError::Database("Failed to update assignment".to_string()))
        } else {
            let assignment = TableAssignment {
                id: None,
                guest: guest.clone(),
                table_id: table.clone(),
                seat_number: None,
                created_at: Utc::now(),
            };
            let created: Option<TableAssignment> =
                self.base.db().create(TABLE).content(assignment).await?;
            created.ok_or_else(|| RepoError::Database("Failed to create assignment".to_string()))
        }
    }

    /// Unassign a guest
    pub async fn delete_by_guest(&self, guest: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE table_assignment WHERE guest = $guest")
            .bind(("guest", guest.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
