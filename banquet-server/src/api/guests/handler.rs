//! Guest List Handlers
//!
//! Phone numbers are normalized to `+61` E.164 form before they hit storage,
//! so the per-account uniqueness check sees one spelling per number.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{GuestCreate, GuestUpdate, GuestView};
use crate::utils::phone::{format_au_phone, is_valid_au_mobile};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive filter over names, phone, group and plus-one names
    #[serde(default)]
    pub search: Option<String>,
}

/// GET /api/guests - all guests with plus-ones, RSVP and assignment joined
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<GuestView>>> {
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());
    let guests = state.guests.find_all(&user.account, search).await?;
    Ok(Json(guests))
}

/// GET /api/guests/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<GuestView>> {
    let guest = state
        .guests
        .find_by_id(&user.account, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Guest {id} not found")))?;
    Ok(Json(guest))
}

/// POST /api/guests - create with a fresh passcode and a pending RSVP
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(mut payload): Json<GuestCreate>,
) -> AppResult<Json<GuestView>> {
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.group_name, "group_name", MAX_SHORT_TEXT_LEN)?;
    for plus_one in &payload.plus_ones {
        validate_optional_text(&Some(plus_one.name.clone()), "plus_one name", MAX_NAME_LEN)?;
    }

    payload.phone = normalize_phone(&payload.phone)?;

    let guest = state.guests.create(&user.account, payload).await?;
    Ok(Json(guest))
}

/// PUT /api/guests/:id - edit; the plus-one list is replaced wholesale
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(mut payload): Json<GuestUpdate>,
) -> AppResult<Json<GuestView>> {
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.group_name, "group_name", MAX_SHORT_TEXT_LEN)?;

    payload.phone = normalize_phone(&payload.phone)?;

    let guest = state.guests.update(&user.account, &id, payload).await?;
    Ok(Json(guest))
}

/// DELETE /api/guests/:id - cascades to plus-ones, RSVP, assignment and log
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = state.guests.delete(&user.account, &id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Guest {id} not found")));
    }
    Ok(Json(true))
}

fn normalize_phone(phone: &str) -> AppResult<String> {
    if !is_valid_au_mobile(phone) {
        return Err(AppError::validation(
            "phone must be a valid Australian mobile number",
        ));
    }
    Ok(format_au_phone(phone))
}
