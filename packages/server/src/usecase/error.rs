//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{ConnectionId, ConnectionState, RegistryError};

/// Errors returned by hub operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    /// Registry contract violation; indicates a transport adapter bug
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The operation requires a `Connected` connection
    #[error("connection '{connection_id}' is not connected (state: {state})")]
    InvalidState {
        connection_id: ConnectionId,
        state: ConnectionState,
    },

    /// No cache is registered under this name
    #[error("no cache registered as '{0}'")]
    UnknownCache(String),
}
