//! Banquet Server - wedding event management backend
//!
//! Guest lists with passcode-gated RSVP, a floor-plan seating editor with
//! capacity-checked table assignments, and invitation / QR check-in delivery
//! over an SMS/MMS gateway.
//!
//! # Module structure
//!
//! ```text
//! banquet-server/src/
//! ├── core/        # config, shared state, HTTP server
//! ├── auth/        # JWT validation for the admin API
//! ├── api/         # routes and handlers
//! ├── db/          # embedded SurrealDB models and repositories
//! ├── seating/     # occupancy and floor-plan geometry rules
//! ├── messaging/   # SMS/MMS gateway client
//! ├── qr/          # check-in tokens and QR rendering
//! └── utils/       # phone/passcode/time helpers, errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod messaging;
pub mod qr;
pub mod seating;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
