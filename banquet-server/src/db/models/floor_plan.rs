//! Floor Plan Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Default design-space canvas size, created lazily on first access
pub const DEFAULT_WIDTH: i64 = 1000;
pub const DEFAULT_HEIGHT: i64 = 700;

/// Floor plan entity — the single per-account canvas tables are placed on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Organizer account id
    pub account: String,
    /// Design-space width
    pub width: i64,
    /// Design-space height
    pub height: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Floor plan update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlanUpdate {
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    /// Absent keeps the stored image; an explicit `null` clears it
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub background_image_url: Option<Option<String>>,
}
