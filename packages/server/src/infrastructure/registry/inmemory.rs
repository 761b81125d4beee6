//! InMemory ConnectionRegistry implementation
//!
//! Two sharded maps: connection id to connection slot, and group name to
//! member ids. Every per-connection operation holds that connection's slot
//! lock, so register/unregister/join/leave of one connection are serialized
//! while different connections proceed in parallel.
//!
//! Lock order is always slot lock, then a group shard. Shard guards are
//! never held across an `.await`.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use tokio::sync::Mutex;
use tsudoi_shared::time::get_jst_timestamp;

use crate::domain::{
    ChatClient, Connection, ConnectionId, ConnectionInfo, ConnectionRegistry, ConnectionState,
    GroupName, RegistryError, Timestamp,
};

/// A registered connection plus its liveness flag.
///
/// `live` turns false under the slot lock once `unregister` has purged the
/// connection's groups; a concurrent `join_group` waiting on the same lock
/// then fails instead of re-inserting a dead id.
struct ConnectionSlot {
    connection: Connection,
    live: bool,
}

type SharedSlot = Arc<Mutex<ConnectionSlot>>;

/// In-memory connection registry
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Live connections
    connections: DashMap<ConnectionId, SharedSlot>,
    /// Group memberships; empty groups are dropped
    groups: DashMap<GroupName, BTreeSet<ConnectionId>>,
}

impl InMemoryConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &ConnectionId) -> Option<SharedSlot> {
        self.connections
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
    }

    fn remove_member(&self, group: &GroupName, id: &ConnectionId) {
        if let Entry::Occupied(mut entry) = self.groups.entry(group.clone()) {
            entry.get_mut().remove(id);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        id: ConnectionId,
        client: Arc<dyn ChatClient>,
    ) -> Result<(), RegistryError> {
        match self.connections.entry(id) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateConnection(entry.key().clone())),
            Entry::Vacant(entry) => {
                let connection = Connection::new(
                    entry.key().clone(),
                    client,
                    Timestamp::new(get_jst_timestamp()),
                );
                entry.insert(Arc::new(Mutex::new(ConnectionSlot {
                    connection,
                    live: true,
                })));
                Ok(())
            }
        }
    }

    async fn unregister(&self, id: &ConnectionId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let mut slot = slot.lock().await;
        if !slot.live {
            return false;
        }

        for group in std::mem::take(&mut slot.connection.groups) {
            self.remove_member(&group, id);
        }
        slot.live = false;
        slot.connection.state = ConnectionState::Disconnected;
        self.connections.remove(id);
        true
    }

    async fn join_group(
        &self,
        id: &ConnectionId,
        group: &GroupName,
    ) -> Result<(), RegistryError> {
        let slot = self
            .slot(id)
            .ok_or_else(|| RegistryError::UnknownConnection(id.clone()))?;
        let mut slot = slot.lock().await;
        if !slot.live {
            return Err(RegistryError::UnknownConnection(id.clone()));
        }

        if slot.connection.groups.insert(group.clone()) {
            self.groups
                .entry(group.clone())
                .or_default()
                .insert(id.clone());
        }
        Ok(())
    }

    async fn leave_group(&self, id: &ConnectionId, group: &GroupName) {
        let Some(slot) = self.slot(id) else {
            return;
        };
        let mut slot = slot.lock().await;
        if slot.live && slot.connection.groups.remove(group) {
            self.remove_member(group, id);
        }
    }

    async fn members_of(&self, group: &GroupName) -> BTreeSet<ConnectionId> {
        self.groups
            .get(group)
            .map(|members| members.value().clone())
            .unwrap_or_default()
    }

    async fn all(&self) -> BTreeSet<ConnectionId> {
        self.connections
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    async fn client(&self, id: &ConnectionId) -> Option<Arc<dyn ChatClient>> {
        let slot = self.slot(id)?;
        let slot = slot.lock().await;
        slot.live.then(|| Arc::clone(&slot.connection.client))
    }

    async fn state(&self, id: &ConnectionId) -> Option<ConnectionState> {
        let slot = self.slot(id)?;
        let slot = slot.lock().await;
        slot.live.then_some(slot.connection.state)
    }

    async fn set_state(
        &self,
        id: &ConnectionId,
        state: ConnectionState,
    ) -> Result<(), RegistryError> {
        let slot = self
            .slot(id)
            .ok_or_else(|| RegistryError::UnknownConnection(id.clone()))?;
        let mut slot = slot.lock().await;
        if !slot.live {
            return Err(RegistryError::UnknownConnection(id.clone()));
        }
        slot.connection.state = state;
        Ok(())
    }

    async fn connections(&self) -> Vec<ConnectionInfo> {
        let slots: Vec<SharedSlot> = self
            .connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut infos = Vec::with_capacity(slots.len());
        for slot in slots {
            let slot = slot.lock().await;
            if slot.live {
                infos.push(slot.connection.info());
            }
        }
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    async fn groups(&self) -> BTreeMap<GroupName, BTreeSet<ConnectionId>> {
        self.groups
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
