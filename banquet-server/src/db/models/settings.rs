//! Wedding Settings Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Wedding settings entity — at most one row per organizer account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeddingSettings {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Organizer account id (scopes every read/write)
    pub account: String,
    pub couple_names: String,
    /// ISO date, `YYYY-MM-DD`
    pub wedding_date: String,
    /// 24h time, `HH:MM`
    pub wedding_time: String,
    pub venue_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload — created on first save, updated thereafter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeddingSettingsUpsert {
    pub couple_names: String,
    pub wedding_date: String,
    pub wedding_time: String,
    pub venue_name: String,
    #[serde(default)]
    pub venue_address: Option<String>,
    /// Absent keeps the stored image; an explicit `null` clears it
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub invitation_image_url: Option<Option<String>>,
}
