//! Public QR Landing Handler

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct QrLookupResponse {
    pub guest_name: String,
    pub plus_one_names: Vec<String>,
    /// None until the guest has a table assignment
    pub table_name: Option<String>,
}

/// GET /api/qr/:code
pub async fn lookup(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<QrLookupResponse>> {
    let view = state
        .guests
        .find_by_qr(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Unknown code"))?;

    let guest_name = match &view.guest.last_name {
        Some(last) => format!("{} {}", view.guest.first_name, last),
        None => view.guest.first_name.clone(),
    };

    Ok(Json(QrLookupResponse {
        guest_name,
        plus_one_names: view.plus_ones.into_iter().map(|p| p.name).collect(),
        table_name: view.table_assignment.map(|t| t.table_name),
    }))
}
