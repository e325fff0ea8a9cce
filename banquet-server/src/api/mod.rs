//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`settings`] - wedding settings
//! - [`guests`] - guest list CRUD
//! - [`floor_plan`] - floor plan canvas
//! - [`tables`] - seating tables
//! - [`assignments`] - guest-to-table assignments
//! - [`rsvp`] - public passcode-gated RSVP flow
//! - [`qr`] - public QR landing lookup
//! - [`mms`] - invitation and QR delivery over the SMS/MMS gateway
//! - [`stats`] - dashboard counters
//! - [`upload`] - image upload

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod assignments;
pub mod floor_plan;
pub mod guests;
pub mod health;
pub mod mms;
pub mod qr;
pub mod rsvp;
pub mod settings;
pub mod stats;
pub mod tables;
pub mod upload;

// Re-export common types for handlers
pub use crate::utils::AppResult;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(settings::router())
        .merge(guests::router())
        .merge(floor_plan::router())
        .merge(tables::router())
        .merge(assignments::router())
        .merge(rsvp::router())
        .merge(qr::router())
        .merge(mms::router())
        .merge(stats::router())
        .merge(upload::router())
        // Static serving of uploaded and generated images
        .nest_service("/images", ServeDir::new(state.config.images_dir()))
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router(&state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    HeaderName::from_static("x-request-id"),
                    XRequestId,
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        // JWT authentication, runs before routes and injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}
