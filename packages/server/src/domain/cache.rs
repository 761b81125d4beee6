//! Keyed cache collaborator.
//!
//! The hub receives a fixed name-to-cache mapping at composition time and
//! resolves caches by name when a client asks for a lookup.

use std::{collections::HashMap, fmt, sync::Arc};

/// Cache-like service looked up by key.
pub trait Cache: Send + Sync {
    /// Resolve a value for `key`
    fn get(&self, key: &str) -> String;
}

/// Named caches, resolved once when the hub is composed.
#[derive(Clone, Default)]
pub struct KeyedCaches {
    caches: HashMap<String, Arc<dyn Cache>>,
}

impl KeyedCaches {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `cache` under `name`, replacing any previous entry
    pub fn with(mut self, name: impl Into<String>, cache: Arc<dyn Cache>) -> Self {
        self.caches.insert(name.into(), cache);
        self
    }

    /// Look up a cache by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Cache>> {
        self.caches.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caches.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for KeyedCaches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedCaches")
            .field("names", &self.names())
            .finish()
    }
}
