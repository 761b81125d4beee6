//! WebSocket chat hub server implementation.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{ServerError, build_hub, create_app, run};
