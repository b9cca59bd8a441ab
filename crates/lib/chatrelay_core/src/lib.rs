//! # chatrelay_core
//!
//! Core domain logic for chatrelay: the outbound message model, the
//! [`messaging::MessagingClient`] seam, and the Rasa REST channel client.

pub mod config;
pub mod message;
pub mod messaging;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
