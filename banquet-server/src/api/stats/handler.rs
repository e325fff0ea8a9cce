//! Dashboard Stats Handler

use axum::{Json, extract::State};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::RsvpStatus;
use crate::seating::party_size;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_guests: usize,
    pub attending: usize,
    pub not_attending: usize,
    pub pending: usize,
    /// Headcount across attending parties
    pub total_attending_headcount: i64,
    pub invitations_sent: usize,
    pub qr_codes_sent: usize,
    pub tables: usize,
    pub total_capacity: i64,
    pub guests_seated: usize,
}

/// GET /api/stats
pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<StatsResponse>> {
    let guests = state.guests.find_all(&user.account, None).await?;

    let mut attending = 0usize;
    let mut not_attending = 0usize;
    let mut pending = 0usize;
    let mut headcount = 0i64;
    for view in &guests {
        match view.rsvp.as_ref().map(|r| r.status) {
            Some(RsvpStatus::Attending) => {
                attending += 1;
                headcount += party_size(view.rsvp.as_ref());
            }
            Some(RsvpStatus::NotAttending) => not_attending += 1,
            Some(RsvpStatus::Pending) | None => pending += 1,
        }
    }

    let plan = state.floor_plans.find_or_create(&user.account).await?;
    let tables = match plan.id.as_ref() {
        Some(plan_id) => state.tables.find_by_plan(plan_id).await?,
        None => Vec::new(),
    };

    Ok(Json(StatsResponse {
        total_guests: guests.len(),
        attending,
        not_attending,
        pending,
        total_attending_headcount: headcount,
        invitations_sent: guests
            .iter()
            .filter(|g| g.guest.invitation_sent_at.is_some())
            .count(),
        qr_codes_sent: guests.iter().filter(|g| g.guest.qr_sent_at.is_some()).count(),
        tables: tables.len(),
        total_capacity: tables.iter().map(|t| t.capacity).sum(),
        guests_seated: guests
            .iter()
            .filter(|g| g.table_assignment.is_some())
            .count(),
    }))
}
