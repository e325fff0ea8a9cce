//! Guest Repository
//!
//! Guests plus their child records (plus-ones, RSVP, table assignment).
//! Joined shapes are normalized here: a guest's RSVP and assignment come
//! back as at most one value each, whatever the storage layer returns.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    Guest, GuestCreate, GuestTableRef, GuestUpdate, GuestView, PlusOne, Rsvp, RsvpStatus,
    SeatingTable, TableAssignment,
};
use crate::utils::passcode::generate_passcode;
use chrono::Utc;
use std::collections::HashMap;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "guest";

/// Attempts before giving up on finding a collision-free passcode
const PASSCODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct GuestRepository {
    base: BaseRepository,
}

impl GuestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // ── Views ───────────────────────────────────────────────────────

    /// All guests for an account, newest first, with children joined.
    ///
    /// `search` filters case-insensitively over name, phone, group label and
    /// plus-one names.
    pub async fn find_all(
        &self,
        account: &str,
        search: Option<&str>,
    ) -> RepoResult<Vec<GuestView>> {
        let guests: Vec<Guest> = self
            .base
            .db()
            .query("SELECT * FROM guest WHERE account = $account ORDER BY created_at DESC")
            .bind(("account", account.to_string()))
            .await?
            .take(0)?;

        let mut views = self.assemble_views(guests).await?;

        if let Some(term) = search {
            let term = term.to_lowercase();
            views.retain(|v| matches_search(v, &term));
        }

        Ok(views)
    }

    /// One guest by id, scoped to the account
    pub async fn find_by_id(&self, account: &str, id: &str) -> RepoResult<Option<GuestView>> {
        let record = self.base.parse_id(id, TABLE)?;
        let guests: Vec<Guest> = self
            .base
            .db()
            .query("SELECT * FROM guest WHERE id = $id AND account = $account")
            .bind(("id", record))
            .bind(("account", account.to_string()))
            .await?
            .take(0)?;

        Ok(self.assemble_views(guests).await?.into_iter().next())
    }

    /// Selected guests by id list, scoped to the account (bulk sends)
    pub async fn find_by_ids(&self, account: &str, ids: &[String]) -> RepoResult<Vec<GuestView>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            records.push(self.base.parse_id(id, TABLE)?);
        }

        let guests: Vec<Guest> = self
            .base
            .db()
            .query("SELECT * FROM guest WHERE id IN $ids AND account = $account")
            .bind(("ids", records))
            .bind(("account", account.to_string()))
            .await?
            .take(0)?;

        self.assemble_views(guests).await
    }

    /// Token-gated lookup for the QR landing page — deliberately unscoped,
    /// the opaque code is the only credential
    pub async fn find_by_qr(&self, code: &str) -> RepoResult<Option<GuestView>> {
        let guests: Vec<Guest> = self
            .base
            .db()
            .query("SELECT * FROM guest WHERE qr_code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;

        Ok(self.assemble_views(guests).await?.into_iter().next())
    }

    /// Unscoped fetch by record id, for flows where the caller has already
    /// proven identity (passcode-validated RSVP submission)
    pub async fn find_by_record(&self, guest: &RecordId) -> RepoResult<Option<GuestView>> {
        let guests: Vec<Guest> = self
            .base
            .db()
            .query("SELECT * FROM guest WHERE id = $id")
            .bind(("id", guest.clone()))
            .await?
            .take(0)?;

        Ok(self.assemble_views(guests).await?.into_iter().next())
    }

    /// Passcode validation: case-insensitive first name, exact passcode.
    /// Returns nothing distinguishable between "wrong name" and "wrong code".
    pub async fn validate_passcode(
        &self,
        first_name: &str,
        passcode: &str,
    ) -> RepoResult<Option<GuestView>> {
        let guests: Vec<Guest> = self
            .base
            .db()
            .query(
                "SELECT * FROM guest \
                 WHERE string::lowercase(first_name) = string::lowercase($first) \
                   AND passcode = $code \
                 LIMIT 1",
            )
            .bind(("first", first_name.trim().to_string()))
            .bind(("code", passcode.trim().to_string()))
            .await?
            .take(0)?;

        Ok(self.assemble_views(guests).await?.into_iter().next())
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Create a guest with a fresh passcode, their plus-ones, and a pending
    /// RSVP row
    pub async fn create(&self, account: &str, data: GuestCreate) -> RepoResult<GuestView> {
        let passcode = self.fresh_passcode(account, &data.first_name).await?;
        let now = Utc::now();

        let guest = Guest {
            id: None,
            account: account.to_string(),
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            passcode,
            plus_ones_allowed: data.plus_ones_allowed.unwrap_or(0),
            notes: data.notes,
            group_name: data.group_name,
            qr_code: None,
            invitation_sent_at: None,
            qr_sent_at: None,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Guest> = self.base.db().create(TABLE).content(guest).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create guest".to_string()))?;
        let guest_id = created
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Created guest missing id".to_string()))?;

        let names: Vec<String> = data.plus_ones.into_iter().map(|p| p.name).collect();
        self.replace_plus_ones(&guest_id, &names).await?;

        // Pending RSVP, upserted into existence
        self.upsert_rsvp(&guest_id, RsvpStatus::Pending, 0, false)
            .await?;

        self.find_by_id(account, &guest_id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Created guest not found".to_string()))
    }

    /// Edit a guest; the plus-one list is replaced wholesale
    pub async fn update(
        &self,
        account: &str,
        id: &str,
        data: GuestUpdate,
    ) -> RepoResult<GuestView> {
        let record = self.base.parse_id(id, TABLE)?;
        if self.find_by_id(account, id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Guest {id} not found")));
        }

        self.base
            .db()
            .query(
                "UPDATE $id SET first_name = $first_name, last_name = $last_name, \
                 phone = $phone, plus_ones_allowed = $allowed, notes = $notes, \
                 group_name = $group_name, updated_at = $now",
            )
            .bind(("id", record.clone()))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("phone", data.phone))
            .bind(("allowed", data.plus_ones_allowed.unwrap_or(0)))
            .bind(("notes", data.notes))
            .bind(("group_name", data.group_name))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        let names: Vec<String> = data.plus_ones.into_iter().map(|p| p.name).collect();
        self.replace_plus_ones(&record, &names).await?;

        self.find_by_id(account, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Guest {id} not found")))
    }

    /// Delete a guest and cascade to plus-ones, RSVP, assignment and log
    pub async fn delete(&self, account: &str, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(id, TABLE)?;
        let existing = self.find_by_id(account, id).await?;
        if existing.is_none() {
            return Ok(false);
        }

        // Link columns hold the string form of the record id
        self.base
            .db()
            .query("DELETE plus_one WHERE guest = $gid")
            .query("DELETE rsvp WHERE guest = $gid")
            .query("DELETE table_assignment WHERE guest = $gid")
            .query("DELETE message_log WHERE guest = $gid")
            .query("DELETE $guest")
            .bind(("gid", record.to_string()))
            .bind(("guest", record))
            .await?
            .check()?;

        Ok(true)
    }

    /// Replace the guest's plus-one list (delete-then-insert, not atomic)
    pub async fn replace_plus_ones(&self, guest: &RecordId, names: &[String]) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE plus_one WHERE guest = $guest")
            .bind(("guest", guest.to_string()))
            .await?
            .check()?;

        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            let plus_one = PlusOne {
                id: None,
                guest: guest.clone(),
                name: trimmed.to_string(),
                created_at: Utc::now(),
            };
            let _: Option<PlusOne> = self.base.db().create("plus_one").content(plus_one).await?;
        }

        Ok(())
    }

    /// Upsert the guest's RSVP row, keyed by guest id
    ///
    /// `responded` stamps `responded_at`; guest creation seeds a pending row
    /// without a response timestamp.
    pub async fn upsert_rsvp(
        &self,
        guest: &RecordId,
        status: RsvpStatus,
        number_attending: i64,
        responded: bool,
    ) -> RepoResult<Rsvp> {
        let now = Utc::now();
        let existing: Vec<Rsvp> = self
            .base
            .db()
            .query("SELECT * FROM rsvp WHERE guest = $guest LIMIT 1")
            .bind(("guest", guest.to_string()))
            .await?
            .take(0)?;

        if let Some(mut rsvp) = existing.into_iter().next() {
            rsvp.status = status;
            rsvp.number_attending = number_attending;
            if responded {
                rsvp.responded_at = Some(now);
            }
            rsvp.updated_at = now;
            let id = rsvp
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("RSVP row missing id".to_string()))?;
            let saved: Option<Rsvp> = self.base.db().update(id).content(rsvp).await?;
            saved.ok_or_else(|| RepoError::Database("Failed to update RSVP".to_string()))
        } else {
            let rsvp = Rsvp {
                id: None,
                guest: guest.clone(),
                status,
                number_attending,
                responded_at: responded.then_some(now),
                created_at: now,
                updated_at: now,
            };
            let created: Option<Rsvp> = self.base.db().create("rsvp").content(rsvp).await?;
            created.ok_or_else(|| RepoError::Database("Failed to create RSVP".to_string()))
        }
    }

    /// Store a freshly generated QR token on the guest
    pub async fn set_qr_code(&self, guest: &RecordId, code: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $guest SET qr_code = $code, updated_at = $now")
            .bind(("guest", guest.clone()))
            .bind(("code", code.to_string()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }

    /// Stamp the invitation-sent timestamp
    pub async fn stamp_invitation_sent(&self, guest: &RecordId) -> RepoResult<()> {
        self.stamp(guest, "invitation_sent_at").await
    }

    /// Stamp the qr-sent timestamp
    pub async fn stamp_qr_sent(&self, guest: &RecordId) -> RepoResult<()> {
        self.stamp(guest, "qr_sent_at").await
    }

    async fn stamp(&self, guest: &RecordId, field: &str) -> RepoResult<()> {
        // Field name comes from the two callers above, never from input
        self.base
            .db()
            .query(format!("UPDATE $guest SET {field} = $now, updated_at = $now"))
            .bind(("guest", guest.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Generate a passcode that no other guest of this account shares with
    /// the same (lowercased) first name
    async fn fresh_passcode(&self, account: &str, first_name: &str) -> RepoResult<String> {
        for _ in 0..PASSCODE_ATTEMPTS {
            let candidate = generate_passcode(first_name);
            let clashes: Vec<Guest> = self
                .base
                .db()
                .query(
                    "SELECT * FROM guest WHERE account = $account \
                     AND string::lowercase(first_name) = string::lowercase($first) \
                     AND passcode = $code LIMIT 1",
                )
                .bind(("account", account.to_string()))
                .bind(("first", first_name.to_string()))
                .bind(("code", candidate.clone()))
                .await?
                .take(0)?;
            if clashes.is_empty() {
                return Ok(candidate);
            }
        }
        Err(RepoError::Duplicate(
            "Could not generate a unique passcode for this guest".to_string(),
        ))
    }

    /// Join children onto a batch of guests
    async fn assemble_views(&self, guests: Vec<Guest>) -> RepoResult<Vec<GuestView>> {
        if guests.is_empty() {
            return Ok(Vec::new());
        }

        // Child link columns hold the string form of the guest id
        let ids: Vec<String> = guests
            .iter()
            .filter_map(|g| g.id.as_ref().map(|id| id.to_string()))
            .collect();

        let plus_ones: Vec<PlusOne> = self
            .base
            .db()
            .query("SELECT * FROM plus_one WHERE guest IN $ids ORDER BY created_at")
            .bind(("ids", ids.clone()))
            .await?
            .take(0)?;

        let rsvps: Vec<Rsvp> = self
            .base
            .db()
            .query("SELECT * FROM rsvp WHERE guest IN $ids")
            .bind(("ids", ids.clone()))
            .await?
            .take(0)?;

        let assignments: Vec<TableAssignment> = self
            .base
            .db()
            .query("SELECT * FROM table_assignment WHERE guest IN $ids")
            .bind(("ids", ids.clone()))
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
        let table_names: HashMap<String, String> = tables
            .into_iter()
            .filter_map(|t| t.id.as_ref().map(|id| (id.to_string(), t.name.clone())))
            .collect();

        let mut plus_by_guest: HashMap<String, Vec<PlusOne>> = HashMap::new();
        for p in plus_ones {
            plus_by_guest
                .entry(p.guest.to_string())
                .or_default()
                .push(p);
        }

        // At most one RSVP / assignment per guest; later rows are ignored
        let mut rsvp_by_guest: HashMap<String, Rsvp> = HashMap::new();
        for r in rsvps {
            rsvp_by_guest.entry(r.guest.to_string()).or_insert(r);
        }
        let mut assign_by_guest: HashMap<String, TableAssignment> = HashMap::new();
        for a in assignments {
            assign_by_guest.entry(a.guest.to_string()).or_insert(a);
        }

        let views = guests
            .into_iter()
            .map(|guest| {
                let key = guest
                    .id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                let table_assignment = assign_by_guest.remove(&key).map(|a| GuestTableRef {
                    table_name: table_names
                        .get(&a.table_id.to_string())
                        .cloned()
                        .unwrap_or_default(),
                    table_id: a.table_id,
                });
                GuestView {
                    plus_ones: plus_by_guest.remove(&key).unwrap_or_default(),
                    rsvp: rsvp_by_guest.remove(&key),
                    table_assignment,
                    guest,
                }
            })
            .collect();

        Ok(views)
    }
}

fn matches_search(view: &GuestView, term: &str) -> bool {
    let g = &view.guest;
    let hay = |s: &str| s.to_lowercase().contains(term);

    hay(&g.first_name)
        || g.last_name.as_deref().is_some_and(hay)
        || hay(&g.phone)
        || g.group_name.as_deref().is_some_and(hay)
        || view.plus_ones.iter().any(|p| hay(&p.name))
}
