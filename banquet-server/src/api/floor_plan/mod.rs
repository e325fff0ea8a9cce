//! Floor Plan API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/floor-plan",
        get(handler::get_plan).put(handler::update_plan),
    )
}
