//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResult`] - application error types
//! - [`phone`] - Australian phone number formatting
//! - [`passcode`] - RSVP passcode generation
//! - [`time`] - message date/time formatting
//! - [`validation`] - request field validation
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod passcode;
pub mod phone;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, ErrorBody};
pub use result::AppResult;
