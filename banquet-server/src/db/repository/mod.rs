//! Repository Module
//!
//! Per-entity CRUD over the embedded SurrealDB instance. Every query that
//! touches organizer data is scoped by account id; join-shaped data (RSVP,
//! plus-ones, assignments) is normalized here into canonical single-value
//! shapes so the ambiguity never reaches domain logic.

pub mod assignment;
pub mod floor_plan;
pub mod guest;
pub mod message_log;
pub mod seating_table;
pub mod settings;

// Re-exports
pub use assignment::{AssignmentRepository, AssignmentView, SeatedGuest};
pub use floor_plan::FloorPlanRepository;
pub use guest::GuestRepository;
pub use message_log::MessageLogRepository;
pub use seating_table::SeatingTableRepository;
pub use settings::SettingsRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as index errors; the only unique
        // index is the per-account guest phone
        if msg.contains("uniq_guest_phone") {
            RepoError::Duplicate("A guest with this phone number already exists".to_string())
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Parse a `"table:id"` string, rejecting ids for the wrong table
    pub fn parse_id(&self, id: &str, table: &str) -> RepoResult<surrealdb::RecordId> {
        let record: surrealdb::RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
        if record.table() != table {
            return Err(RepoError::Validation(format!("Invalid {table} ID: {id}")));
        }
        Ok(record)
    }
}
