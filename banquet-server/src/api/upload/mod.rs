//! Image Upload API
//!
//! Accepts PNG/JPEG/WebP, converts to JPEG, and stores under a content-hash
//! filename so re-uploading the same image is a no-op.

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        .layer(DefaultBodyLimit::max(handler::MAX_FILE_SIZE + 1024))
}
