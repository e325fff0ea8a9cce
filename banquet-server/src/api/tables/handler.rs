//! Seating Table Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{SeatingTable, SeatingTableCreate, SeatingTableUpdate};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/tables - all tables on the account's plan
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<SeatingTable>>> {
    let plan = state.floor_plans.find_or_create(&user.account).await?;
    let plan_id = plan_record(&plan)?;
    let tables = state.tables.find_by_plan(&plan_id).await?;
    Ok(Json(tables))
}

/// POST /api/tables - place a table with shape-dependent defaults
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SeatingTableCreate>,
) -> AppResult<Json<SeatingTable>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(cap) = payload.capacity
        && cap < 1.0
    {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    let plan = state.floor_plans.find_or_create(&user.account).await?;
    let plan_id = plan_record(&plan)?;
    let table = state.tables.create(&plan_id, payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables - update by id carried in the body
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SeatingTableUpdate>,
) -> AppResult<Json<SeatingTable>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(cap) = payload.capacity
        && cap < 1.0
    {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    let plan = state.floor_plans.find_or_create(&user.account).await?;
    let plan_id = plan_record(&plan)?;
    let table = state.tables.update(&plan_id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - removes the table and its assignments
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let plan = state.floor_plans.find_or_create(&user.account).await?;
    let plan_id = plan_record(&plan)?;
    let deleted = state.tables.delete(&plan_id, &id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Table {id} not found")));
    }
    Ok(Json(true))
}

fn plan_record(plan: &crate::db::models::FloorPlan) -> AppResult<surrealdb::RecordId> {
    plan.id
        .clone()
        .ok_or_else(|| AppError::database("Floor plan row missing id"))
}
