//! Public RSVP Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{RsvpStatus, RsvpSubmit, RsvpValidate, WeddingSettings};
use crate::utils::{AppError, AppResult};

/// Guest identity as shown on the RSVP page; the passcode never echoes back
#[derive(Debug, Serialize)]
pub struct ValidatedGuest {
    pub guest_id: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub plus_ones_allowed: i64,
    pub plus_one_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_attending: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub guest: ValidatedGuest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<WeddingSettings>,
}

/// POST /api/rsvp/validate - first name (case-insensitive) + exact passcode.
/// A miss is uniform: nothing distinguishes a wrong name from a wrong code.
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<RsvpValidate>,
) -> AppResult<Json<ValidateResponse>> {
    if payload.first_name.trim().is_empty() || payload.passcode.trim().is_empty() {
        return Err(AppError::invalid_passcode());
    }

    let view = state
        .guests
        .validate_passcode(&payload.first_name, &payload.passcode)
        .await?
        .ok_or_else(AppError::invalid_passcode)?;

    let settings = state.settings.find_by_account(&view.guest.account).await?;

    let guest_id = view
        .guest
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::database("Guest row missing id"))?;

    Ok(Json(ValidateResponse {
        guest: ValidatedGuest {
            guest_id,
            first_name: view.guest.first_name,
            last_name: view.guest.last_name,
            plus_ones_allowed: view.guest.plus_ones_allowed,
            plus_one_names: view.plus_ones.into_iter().map(|p| p.name).collect(),
            rsvp_status: view.rsvp.as_ref().map(|r| r.status),
            number_attending: view.rsvp.as_ref().map(|r| r.number_attending),
        },
        settings,
    }))
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: RsvpStatus,
    pub number_attending: i64,
}

/// POST /api/rsvp/submit - upsert the guest's response.
/// Attending replaces the plus-one list (blanks discarded, capped at the
/// guest's allowance); declining clears the headcount.
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<RsvpSubmit>,
) -> AppResult<Json<SubmitResponse>> {
    let record: surrealdb::RecordId = payload
        .guest_id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid guest ID: {}", payload.guest_id)))?;

    let view = state
        .guests
        .find_by_record(&record)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Guest {} not found", payload.guest_id)))?;

    let (status, number_attending) = match payload.status {
        RsvpStatus::Attending => {
            // at least the guest themselves
            let n = payload.number_attending.unwrap_or(1).max(1);
            (RsvpStatus::Attending, n)
        }
        RsvpStatus::NotAttending => (RsvpStatus::NotAttending, 0),
        RsvpStatus::Pending => {
            return Err(AppError::validation(
                "status must be attending or not_attending",
            ));
        }
    };

    if status == RsvpStatus::Attending {
        let allowed = view.guest.plus_ones_allowed.max(0) as usize;
        let names: Vec<String> = payload
            .plus_one_names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .take(allowed)
            .collect();
        state.guests.replace_plus_ones(&record, &names).await?;
    }

    let rsvp = state
        .guests
        .upsert_rsvp(&record, status, number_attending, true)
        .await?;

    Ok(Json(SubmitResponse {
        status: rsvp.status,
        number_attending: rsvp.number_attending,
    }))
}
