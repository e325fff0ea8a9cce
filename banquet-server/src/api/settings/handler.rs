//! Wedding Settings Handlers

use axum::{Json, extract::State};
use chrono::NaiveDate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{WeddingSettings, WeddingSettingsUpsert};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/settings - the account's settings, null until first saved
pub async fn get_settings(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Option<WeddingSettings>>> {
    let settings = state.settings.find_by_account(&user.account).await?;
    Ok(Json(settings))
}

/// POST /api/settings - create on first save, update thereafter
pub async fn upsert_settings(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WeddingSettingsUpsert>,
) -> AppResult<Json<WeddingSettings>> {
    validate_required_text(&payload.couple_names, "couple_names", MAX_NAME_LEN)?;
    validate_required_text(&payload.venue_name, "venue_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.venue_address, "venue_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(
        &payload.invitation_image_url.clone().flatten(),
        "invitation_image_url",
        MAX_URL_LEN,
    )?;

    if NaiveDate::parse_from_str(&payload.wedding_date, "%Y-%m-%d").is_err() {
        return Err(AppError::validation("wedding_date must be YYYY-MM-DD"));
    }
    if chrono::NaiveTime::parse_from_str(&payload.wedding_time, "%H:%M").is_err() {
        return Err(AppError::validation("wedding_time must be HH:MM"));
    }

    let settings = state.settings.upsert(&user.account, payload).await?;
    Ok(Json(settings))
}
