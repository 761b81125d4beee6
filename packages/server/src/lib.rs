//! Typed real-time chat hub.
//!
//! Clients connect over WebSocket, automatically join the `"SignalR Users"`
//! group, and broadcast `(user, message)` pairs to everyone, back to
//! themselves, or to the group. Delivery goes through the typed
//! `ChatClient::receive_message` contract.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{ServerError, build_hub, create_app, run};
