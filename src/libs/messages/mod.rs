//! Centralized user-facing messages.
//!
//! Every line printed to the terminal is a [`Message`] variant rendered through
//! its `Display` implementation, and emitted through the `msg_*` macros so that
//! debug runs are routed into `tracing` instead of plain stdout.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
