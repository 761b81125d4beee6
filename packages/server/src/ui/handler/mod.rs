//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_group_detail, get_hub_summary, health_check};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
