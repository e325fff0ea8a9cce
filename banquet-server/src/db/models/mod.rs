//! Database Models

// Serde helpers
pub mod serde_helpers;

// Settings
pub mod settings;

// Guests
pub mod guest;
pub mod rsvp;

// Seating
pub mod assignment;
pub mod floor_plan;
pub mod seating_table;

// Messaging
pub mod message_log;

// Re-exports
pub use assignment::{AssignmentCreate, TableAssignment};
pub use floor_plan::{FloorPlan, FloorPlanUpdate};
pub use guest::{Guest, GuestCreate, GuestTableRef, GuestUpdate, GuestView, PlusOne, PlusOneInput};
pub use message_log::{MessageLog, MessageStatus, MessageType};
pub use rsvp::{Rsvp, RsvpStatus, RsvpSubmit, RsvpValidate};
pub use seating_table::{SeatingTable, SeatingTableCreate, SeatingTableUpdate, TableShape};
pub use settings::{WeddingSettings, WeddingSettingsUpsert};
