//! Table occupancy and capacity rules
//!
//! A guest's party size counts their RSVP headcount when they have responded
//! attending; everyone else counts as one seat until their response says
//! otherwise.

use crate::db::models::{Rsvp, RsvpStatus};
use crate::db::repository::SeatedGuest;

/// Seats a guest's party occupies
pub fn party_size(rsvp: Option<&Rsvp>) -> i64 {
    match rsvp {
        Some(r) if r.status == RsvpStatus::Attending => r.number_attending.max(1),
        _ => 1,
    }
}

/// Seats currently taken at a table
pub fn table_occupancy(seated: &[SeatedGuest]) -> i64 {
    seated.iter().map(|s| party_size(s.rsvp.as_ref())).sum()
}

/// Whether a new party fits at a table, and the shortfall if not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityCheck {
    Fits,
    Exceeded { occupied: i64, capacity: i64, incoming: i64 },
}

pub fn check_capacity(capacity: i64, seated: &[SeatedGuest], incoming: i64) -> CapacityCheck {
    let occupied = table_occupancy(seated);
    if occupied + incoming > capacity {
        CapacityCheck::Exceeded {
            occupied,
            capacity,
            incoming,
        }
    } else {
        CapacityCheck::Fits
    }
}
