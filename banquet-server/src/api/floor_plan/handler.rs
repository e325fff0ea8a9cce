//! Floor Plan Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{FloorPlan, FloorPlanUpdate};
use crate::utils::validation::{MAX_URL_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// GET /api/floor-plan - lazily created at the default canvas size
pub async fn get_plan(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<FloorPlan>> {
    let plan = state.floor_plans.find_or_create(&user.account).await?;
    Ok(Json(plan))
}

/// PUT /api/floor-plan - resize or set a background image
pub async fn update_plan(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FloorPlanUpdate>,
) -> AppResult<Json<FloorPlan>> {
    validate_optional_text(
        &payload.background_image_url.clone().flatten(),
        "background_image_url",
        MAX_URL_LEN,
    )?;

    if let Some(w) = payload.width
        && w <= 0
    {
        return Err(AppError::validation("width must be positive"));
    }
    if let Some(h) = payload.height
        && h <= 0
    {
        return Err(AppError::validation("height must be positive"));
    }

    let plan = state.floor_plans.update(&user.account, payload).await?;
    Ok(Json(plan))
}
