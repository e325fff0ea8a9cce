//! RSVP Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// RSVP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Pending,
    Attending,
    NotAttending,
}

/// RSVP entity — exactly one per guest, upserted by guest id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rsvp {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub guest: RecordId,
    pub status: RsvpStatus,
    /// Party size including the primary guest; 0 until a response arrives
    #[serde(default)]
    pub number_attending: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// RSVP submission payload (public endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpSubmit {
    /// Guest record id, `"guest:xxx"`
    pub guest_id: String,
    pub status: RsvpStatus,
    #[serde(default)]
    pub number_attending: Option<i64>,
    #[serde(default)]
    pub plus_one_names: Vec<String>,
}

/// Passcode validation payload (public endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpValidate {
    pub first_name: String,
    pub passcode: String,
}
