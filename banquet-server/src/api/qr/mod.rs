//! Public QR Landing API
//!
//! The opaque token in the QR image is the only credential; the response
//! carries just what the check-in screen shows.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/qr/{code}", get(handler::lookup))
}
