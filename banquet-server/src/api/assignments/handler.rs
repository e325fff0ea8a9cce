//! Table Assignment Handlers
//!
//! Assignment is upsert-by-guest, and capacity is enforced here: the party
//! size of everyone already seated (minus the guest being moved) plus the
//! incoming party must fit the table.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::AssignmentCreate;
use crate::db::repository::AssignmentView;
use crate::seating::{CapacityCheck, check_capacity, party_size};
use crate::utils::{AppError, AppResult};

/// GET /api/assignments - all assignments with guest and table names
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<AssignmentView>>> {
    let assignments = state.assignments.find_all(&user.account).await?;
    Ok(Json(assignments))
}

#[derive(Serialize)]
pub struct AssignResponse {
    pub guest_id: String,
    pub table_id: String,
}

/// POST /api/assignments - seat (or move) a guest
pub async fn assign(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AssignmentCreate>,
) -> AppResult<Json<AssignResponse>> {
    let guest = state
        .guests
        .find_by_id(&user.account, &payload.guest_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Guest {} not found", payload.guest_id)))?;
    let guest_id = guest
        .guest
        .id
        .clone()
        .ok_or_else(|| AppError::database("Guest row missing id"))?;

    let plan = state.floor_plans.find_or_create(&user.account).await?;
    let plan_id = plan
        .id
        .clone()
        .ok_or_else(|| AppError::database("Floor plan row missing id"))?;
    let table = state
        .tables
        .find_by_id_in_plan(&plan_id, &payload.table_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", payload.table_id)))?;
    let table_id = table
        .id
        .clone()
        .ok_or_else(|| AppError::database("Table row missing id"))?;

    // Moving within the same table must not count the guest's own party
    let mut seated = state.assignments.seated_at(&table_id).await?;
    seated.retain(|s| s.guest != guest_id);

    let incoming = party_size(guest.rsvp.as_ref());
    if let CapacityCheck::Exceeded {
        occupied, capacity, ..
    } = check_capacity(table.capacity, &seated, incoming)
    {
        return Err(AppError::business_rule(format!(
            "Table {} is full: {} of {} seats taken, party of {} does not fit",
            table.name, occupied, capacity, incoming
        )));
    }

    let assignment = state.assignments.upsert(&guest_id, &table_id).await?;
    Ok(Json(AssignResponse {
        guest_id: assignment.guest.to_string(),
        table_id: assignment.table_id.to_string(),
    }))
}

/// DELETE /api/assignments/:guest_id - unseat a guest
pub async fn unassign(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(guest_id): Path<String>,
) -> AppResult<Json<bool>> {
    let guest = state
        .guests
        .find_by_id(&user.account, &guest_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Guest {guest_id} not found")))?;
    let record = guest
        .guest
        .id
        .clone()
        .ok_or_else(|| AppError::database("Guest row missing id"))?;

    state.assignments.delete_by_guest(&record).await?;
    Ok(Json(true))
}
