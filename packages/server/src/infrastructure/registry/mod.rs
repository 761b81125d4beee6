//! ConnectionRegistry implementations
//!
//! Concrete implementations of the registry trait defined by the domain layer.
//! The UseCase layer depends on the trait, never on these types directly.

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
