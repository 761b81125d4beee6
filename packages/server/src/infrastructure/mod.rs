//! Infrastructure layer
//!
//! Concrete implementations of the domain contracts and the wire DTOs.

pub mod cache;
pub mod client;
pub mod dto;
pub mod registry;

pub use cache::{BigCache, SmallCache, default_caches};
pub use client::ChannelChatClient;
pub use registry::InMemoryConnectionRegistry;
