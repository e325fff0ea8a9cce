//! Guest and Plus-One Models

use super::rsvp::Rsvp;
use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Guest entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Organizer account id
    pub account: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Australian mobile, stored as entered
    pub phone: String,
    /// RSVP access credential, paired with the first name
    pub passcode: String,
    #[serde(default)]
    pub plus_ones_allowed: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Opaque bearer token for the QR landing page, generated on first send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plus-one — replaced wholesale on every guest edit, no stable identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlusOne {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub guest: RecordId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Plus-one name as submitted in guest/RSVP payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlusOneInput {
    pub name: String,
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCreate {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub plus_ones_allowed: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub plus_ones: Vec<PlusOneInput>,
}

/// Update guest payload — plus-ones are replaced wholesale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestUpdate {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub plus_ones_allowed: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub plus_ones: Vec<PlusOneInput>,
}

/// Table assignment summary joined onto a guest listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestTableRef {
    #[serde(with = "serde_helpers::record_id")]
    pub table_id: RecordId,
    pub table_name: String,
}

/// Guest with joined child records, as returned by the guests API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestView {
    #[serde(flatten)]
    pub guest: Guest,
    #[serde(default)]
    pub plus_ones: Vec<PlusOne>,
    /// Canonical single-value shape: the join ambiguity is resolved at the
    /// persistence boundary, never in domain logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsvp: Option<Rsvp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_assignment: Option<GuestTableRef>,
}
