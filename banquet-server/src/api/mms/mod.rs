//! Invitation / QR Delivery API

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/mms/send-invitation", post(handler::send_invitation))
        .route("/api/mms/send-qr", post(handler::send_qr))
        .route("/api/mms/send-reminder", post(handler::send_reminder))
        .route("/api/mms/log", get(handler::log))
        .route("/api/mms/balance", get(handler::balance))
}
