//! Domain layer for the chat hub.
//!
//! This module contains the hub's core model and the contracts the other
//! layers depend on. It is independent of DTOs and infrastructure concerns.

pub mod cache;
pub mod client;
pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod value_object;

pub use cache::{Cache, KeyedCaches};
pub use client::ChatClient;
pub use entity::{Connection, ConnectionInfo, ConnectionState};
pub use error::{DeliveryError, RegistryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use registry::ConnectionRegistry;
pub use value_object::{
    ConnectionId, DEFAULT_GROUP, GroupName, MessageBody, Timestamp, UserName,
};
