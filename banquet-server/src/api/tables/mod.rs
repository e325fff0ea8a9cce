//! Seating Table API
//!
//! Updates travel as a collection-level PUT with the table id in the body,
//! matching how the floor-plan editor batches drag commits.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/tables",
            get(handler::list)
                .post(handler::create)
                .put(handler::update),
        )
        .route("/api/tables/{id}", axum::routing::delete(handler::delete))
}
