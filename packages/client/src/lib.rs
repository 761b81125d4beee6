//! CLI chat client for the Tsudoi hub.
//!
//! Reads lines from the terminal, turns them into hub frames and prints
//! incoming `receive-message` calls.

pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod runner;

// Re-export entry points
pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
