//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::ChatHub;

/// Shared application state
pub struct AppState {
    /// The hub every connection talks to
    pub hub: Arc<ChatHub>,
    /// Capacity of each connection's outbound channel
    pub channel_capacity: usize,
}
