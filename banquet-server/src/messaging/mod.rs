//! SMS/MMS gateway client
//!
//! Thin client over the ClickSend REST API. MMS attachments are sent one
//! message per request because the gateway only accepts a single media file
//! per submission; SMS campaigns go out as one batched request.

mod client;

pub use client::{AccountBalance, MmsClient, SendOutcome, SendReport};
