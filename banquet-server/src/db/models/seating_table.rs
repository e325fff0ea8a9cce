//! Seating Table Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Table shape on the floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableShape {
    Round,
    Rectangular,
    Square,
}

impl TableShape {
    /// Default seat count for a freshly placed table
    pub fn default_capacity(self) -> i64 {
        match self {
            TableShape::Round | TableShape::Square => 8,
            TableShape::Rectangular => 6,
        }
    }

    /// Default design-space width for a freshly placed table
    pub fn default_width(self) -> i64 {
        match self {
            TableShape::Round | TableShape::Square => 80,
            TableShape::Rectangular => 120,
        }
    }

    /// Default design-space height (shape-independent)
    pub fn default_height(self) -> i64 {
        80
    }
}

/// Seating table entity
///
/// Position is stored as a percentage (0-100) of the floor-plan container so
/// rendering is resolution-independent; width/height/rotation are
/// design-space values scaled at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub floor_plan: RecordId,
    pub name: String,
    pub shape: TableShape,
    pub capacity: i64,
    /// Percent of container width, 0-100
    pub position_x: i64,
    /// Percent of container height, 0-100
    pub position_y: i64,
    /// Design-space pixels
    pub width: i64,
    pub height: i64,
    /// Degrees, 0-360
    pub rotation: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create table payload — numeric fields accept fractional input and are
/// rounded to integers on write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingTableCreate {
    pub name: String,
    #[serde(default)]
    pub shape: Option<TableShape>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

/// Update table payload — the table id travels in the body, matching the
/// collection-level PUT used by the floor-plan editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingTableUpdate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shape: Option<TableShape>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}
