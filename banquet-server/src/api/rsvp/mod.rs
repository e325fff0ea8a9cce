//! Public RSVP API
//!
//! Both routes are reachable without a JWT; the passcode is the credential.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/rsvp/validate", post(handler::validate))
        .route("/api/rsvp/submit", post(handler::submit))
}
