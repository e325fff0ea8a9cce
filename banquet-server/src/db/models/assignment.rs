//! Table Assignment Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Guest-to-table link — at most one active assignment per guest,
/// enforced by upsert-on-guest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAssignment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub guest: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub table_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Assignment request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    /// `"guest:xxx"`
    pub guest_id: String,
    /// `"seating_table:xxx"`
    pub table_id: String,
}
