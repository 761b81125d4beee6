//! Core domain models for the chat hub.

use std::{collections::BTreeSet, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    client::ChatClient,
    value_object::{ConnectionId, GroupName, Timestamp},
};

/// Lifecycle state of a connection.
///
/// `Connecting -> Connected -> Disconnected`; `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// A live client connection, owned by the connection registry.
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Typed delivery handle to the remote client
    pub client: Arc<dyn ChatClient>,
    /// Groups this connection currently belongs to
    pub groups: BTreeSet<GroupName>,
    /// Lifecycle state
    pub state: ConnectionState,
    /// Timestamp when the connection was registered
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new connection in the `Connecting` state with no groups
    pub fn new(id: ConnectionId, client: Arc<dyn ChatClient>, connected_at: Timestamp) -> Self {
        Self {
            id,
            client,
            groups: BTreeSet::new(),
            state: ConnectionState::Connecting,
            connected_at,
        }
    }

    /// Snapshot of everything but the delivery handle
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id.clone(),
            state: self.state,
            groups: self.groups.clone(),
            connected_at: self.connected_at,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("groups", &self.groups)
            .field("state", &self.state)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

/// Read-only snapshot of a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub state: ConnectionState,
    pub groups: BTreeSet<GroupName>,
    pub connected_at: Timestamp,
}
