//! Table Assignment API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/assignments",
            get(handler::list).post(handler::assign),
        )
        .route(
            "/api/assignments/{guest_id}",
            axum::routing::delete(handler::unassign),
        )
}
