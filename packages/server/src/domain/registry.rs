//! Connection registry abstraction.
//!
//! The UseCase layer depends on this trait, not on a concrete storage
//! (dependency inversion).

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use async_trait::async_trait;

use super::{
    client::ChatClient,
    entity::{ConnectionInfo, ConnectionState},
    error::RegistryError,
    value_object::{ConnectionId, GroupName},
};

/// Tracks live connections and their group memberships.
///
/// Every id in a group's member set belongs to a live connection; `unregister`
/// purges a connection from all groups before it returns.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a live connection in the `Connecting` state.
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateConnection` if the id is already registered
    async fn register(
        &self,
        id: ConnectionId,
        client: Arc<dyn ChatClient>,
    ) -> Result<(), RegistryError>;

    /// Remove a connection and purge it from every group.
    ///
    /// Idempotent: returns `false` when the connection was already gone.
    async fn unregister(&self, id: &ConnectionId) -> bool;

    /// Add a connection to a group. Joining twice is a no-op.
    ///
    /// # Errors
    ///
    /// `RegistryError::UnknownConnection` if the connection is not registered
    async fn join_group(&self, id: &ConnectionId, group: &GroupName)
    -> Result<(), RegistryError>;

    /// Remove a connection from a group. No-op if it is not a member.
    async fn leave_group(&self, id: &ConnectionId, group: &GroupName);

    /// Snapshot of a group's members
    async fn members_of(&self, group: &GroupName) -> BTreeSet<ConnectionId>;

    /// Snapshot of every live connection id
    async fn all(&self) -> BTreeSet<ConnectionId>;

    /// Delivery handle of a live connection
    async fn client(&self, id: &ConnectionId) -> Option<Arc<dyn ChatClient>>;

    /// Lifecycle state of a live connection
    async fn state(&self, id: &ConnectionId) -> Option<ConnectionState>;

    /// Move a live connection to another lifecycle state.
    ///
    /// # Errors
    ///
    /// `RegistryError::UnknownConnection` if the connection is not registered
    async fn set_state(
        &self,
        id: &ConnectionId,
        state: ConnectionState,
    ) -> Result<(), RegistryError>;

    /// Snapshot of every live connection
    async fn connections(&self) -> Vec<ConnectionInfo>;

    /// Snapshot of every non-empty group
    async fn groups(&self) -> BTreeMap<GroupName, BTreeSet<ConnectionId>>;
}
