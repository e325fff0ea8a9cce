//! Invitation / QR Delivery Handlers
//!
//! Both bulk sends are sequential and per-guest: one recipient failing never
//! aborts the rest, and every attempt lands in the message log with its
//! outcome. Timestamps (`invitation_sent_at`, `qr_sent_at`) are stamped only
//! on gateway acceptance.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{GuestView, MessageLog, MessageStatus, MessageType, WeddingSettings};
use crate::messaging::AccountBalance;
use crate::qr::{generate_qr_jpeg, generate_qr_token};
use crate::utils::time::{format_12h_time, format_long_date};
use crate::utils::{AppError, AppResult};

/// Pause between per-guest QR sends, matching the bulk MMS pacing
const QR_SEND_DELAY: Duration = Duration::from_millis(100);

const MESSAGE_LOG_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub guest_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryResult {
    pub guest_id: String,
    pub to: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryReport {
    pub success: usize,
    pub failed: usize,
    pub results: Vec<DeliveryResult>,
}

/// POST /api/mms/send-invitation
///
/// Composes a per-guest invitation (couple names, formatted date and time,
/// venue, RSVP link with the guest's passcode) over the shared invitation
/// image and sends it to every selected guest.
pub async fn send_invitation(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SendRequest>,
) -> AppResult<Json<DeliveryReport>> {
    let mms = state.mms_client()?;
    let guests = load_guests(&state, &user.account, &payload.guest_ids).await?;
    let settings = require_settings(&state, &user.account).await?;
    let image_url = settings
        .invitation_image_url
        .as_deref()
        .ok_or_else(|| AppError::validation("Upload an invitation image first"))?;
    let media_url = absolute_url(&state, image_url);

    let recipients: Vec<(String, String)> = guests
        .iter()
        .map(|g| (g.guest.phone.clone(), invitation_body(&state, g, &settings)))
        .collect();

    info!(count = recipients.len(), "sending invitations");
    let report = mms
        .send_bulk_mms(&recipients, "Wedding Invitation", &media_url)
        .await;

    let mut results = Vec::with_capacity(guests.len());
    for (guest, outcome) in guests.iter().zip(report.results.iter()) {
        let record = guest
            .guest
            .id
            .clone()
            .ok_or_else(|| AppError::database("Guest row missing id"))?;
        if outcome.success {
            state.guests.stamp_invitation_sent(&record).await?;
        }
        state
            .message_logs
            .insert(
                &user.account,
                &record,
                MessageType::Invitation,
                if outcome.success {
                    MessageStatus::Sent
                } else {
                    MessageStatus::Failed
                },
                outcome.message_id.clone(),
                outcome.error.clone(),
            )
            .await?;
        results.push(DeliveryResult {
            guest_id: record.to_string(),
            to: outcome.to.clone(),
            success: outcome.success,
            error: outcome.error.clone(),
        });
    }

    Ok(Json(DeliveryReport {
        success: report.success,
        failed: report.failed,
        results,
    }))
}

/// POST /api/mms/send-qr
///
/// Ensures each guest has a QR token and a rendered JPEG on disk, then sends
/// the image with a per-guest body naming their table (or "coming soon").
/// Media differs per guest, so sends go out one at a time.
pub async fn send_qr(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SendRequest>,
) -> AppResult<Json<DeliveryReport>> {
    let mms = state.mms_client()?;
    let guests = load_guests(&state, &user.account, &payload.guest_ids).await?;
    let settings = require_settings(&state, &user.account).await?;

    let mut results = Vec::with_capacity(guests.len());
    let mut success = 0usize;

    for (i, guest) in guests.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(QR_SEND_DELAY).await;
        }

        let record = guest
            .guest
            .id
            .clone()
            .ok_or_else(|| AppError::database("Guest row missing id"))?;

        let token = match &guest.guest.qr_code {
            Some(code) => code.clone(),
            None => {
                let token = generate_qr_token();
                state.guests.set_qr_code(&record, &token).await?;
                token
            }
        };

        let media_url = ensure_qr_image(&state, &token)?;
        let body = qr_body(guest, &settings);

        let outcome = mms
            .send_mms(&guest.guest.phone, &body, "Your Check-in Code", &media_url)
            .await;

        if outcome.success {
            success += 1;
            state.guests.stamp_qr_sent(&record).await?;
        }
        state
            .message_logs
            .insert(
                &user.account,
                &record,
                MessageType::QrCode,
                if outcome.success {
                    MessageStatus::Sent
                } else {
                    MessageStatus::Failed
                },
                outcome.message_id.clone(),
                outcome.error.clone(),
            )
            .await?;

        results.push(DeliveryResult {
            guest_id: record.to_string(),
            to: outcome.to,
            success: outcome.success,
            error: outcome.error,
        });
    }

    Ok(Json(DeliveryReport {
        failed: results.len() - success,
        success,
        results,
    }))
}

/// POST /api/mms/send-reminder
///
/// Plain-text SMS reminder, submitted as one batched gateway request.
pub async fn send_reminder(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SendRequest>,
) -> AppResult<Json<DeliveryReport>> {
    let mms = state.mms_client()?;
    let guests = load_guests(&state, &user.account, &payload.guest_ids).await?;
    let settings = require_settings(&state, &user.account).await?;

    let messages: Vec<(String, String)> = guests
        .iter()
        .map(|g| (g.guest.phone.clone(), reminder_body(g, &settings)))
        .collect();

    info!(count = messages.len(), "sending reminders");
    let report = mms.send_bulk_sms(&messages).await;

    let mut results = Vec::with_capacity(guests.len());
    for (guest, outcome) in guests.iter().zip(report.results.iter()) {
        let record = guest
            .guest
            .id
            .clone()
            .ok_or_else(|| AppError::database("Guest row missing id"))?;
        state
            .message_logs
            .insert(
                &user.account,
                &record,
                MessageType::Reminder,
                if outcome.success {
                    MessageStatus::Sent
                } else {
                    MessageStatus::Failed
                },
                outcome.message_id.clone(),
                outcome.error.clone(),
            )
            .await?;
        results.push(DeliveryResult {
            guest_id: record.to_string(),
            to: outcome.to.clone(),
            success: outcome.success,
            error: outcome.error.clone(),
        });
    }

    Ok(Json(DeliveryReport {
        success: report.success,
        failed: report.failed,
        results,
    }))
}

/// GET /api/mms/log - recent delivery attempts, newest first
pub async fn log(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<MessageLog>>> {
    let logs = state
        .message_logs
        .find_recent(&user.account, MESSAGE_LOG_LIMIT)
        .await?;
    Ok(Json(logs))
}

/// GET /api/mms/balance - remaining gateway credit, null when the gateway
/// cannot be reached
pub async fn balance(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Option<AccountBalance>>> {
    let balance = state.mms_client()?.account_balance().await;
    Ok(Json(balance))
}

// ── Composition ─────────────────────────────────────────────────────

fn invitation_body(state: &ServerState, guest: &GuestView, settings: &WeddingSettings) -> String {
    let date = format_long_date(&settings.wedding_date);
    let time = format_12h_time(&settings.wedding_time);
    let rsvp_url = format!("{}/rsvp", state.config.app_base_url);

    format!(
        "Hi {first}! You're invited to the wedding of {couple} on {date} at {time}, {venue}. \
         RSVP at {rsvp_url} with your first name and passcode {passcode}. \
         We can't wait to celebrate with you!",
        first = guest.guest.first_name,
        couple = settings.couple_names,
        venue = settings.venue_name,
        passcode = guest.guest.passcode,
    )
}

fn reminder_body(guest: &GuestView, settings: &WeddingSettings) -> String {
    format!(
        "Hi {first}! A reminder that {couple}'s wedding is on {date} at {time}, {venue}. \
         See you there!",
        first = guest.guest.first_name,
        couple = settings.couple_names,
        date = format_long_date(&settings.wedding_date),
        time = format_12h_time(&settings.wedding_time),
        venue = settings.venue_name,
    )
}

fn qr_body(guest: &GuestView, settings: &WeddingSettings) -> String {
    let table_line = match guest.table_assignment.as_ref() {
        Some(t) => format!("You're seated at {}.", t.table_name),
        None => "Your table assignment is coming soon.".to_string(),
    };
    format!(
        "Hi {first}! Here's your check-in code for {couple}'s wedding. \
         Show this QR at the door. {table_line}",
        first = guest.guest.first_name,
        couple = settings.couple_names,
    )
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn load_guests(
    state: &ServerState,
    account: &str,
    ids: &[String],
) -> AppResult<Vec<GuestView>> {
    if ids.is_empty() {
        return Err(AppError::validation("guest_ids must not be empty"));
    }
    let guests = state.guests.find_by_ids(account, ids).await?;
    if guests.is_empty() {
        return Err(AppError::not_found("No matching guests"));
    }
    for g in &guests {
        if g.guest.phone.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Guest {} has no phone number",
                g.guest.first_name
            )));
        }
    }
    Ok(guests)
}

async fn require_settings(state: &ServerState, account: &str) -> AppResult<WeddingSettings> {
    state
        .settings
        .find_by_account(account)
        .await?
        .ok_or_else(|| AppError::validation("Save your wedding settings first"))
}

/// Render the token's JPEG under the images dir if not already there and
/// return its public URL
fn ensure_qr_image(state: &ServerState, token: &str) -> AppResult<String> {
    let filename = format!("qr_{token}.jpg");
    let path = state.config.images_dir().join(&filename);
    if !path.exists() {
        let bytes = generate_qr_jpeg(&state.config.app_base_url, token)?;
        std::fs::write(&path, bytes)
            .map_err(|e| AppError::internal(format!("Failed to store QR image: {e}")))?;
    }
    Ok(format!("{}/images/{filename}", state.config.app_base_url))
}

fn absolute_url(state: &ServerState, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            state.config.app_base_url,
            url.trim_start_matches('/')
        )
    }
}
