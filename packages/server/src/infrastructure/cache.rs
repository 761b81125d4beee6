//! Cache implementations registered with the hub by name.

use std::sync::Arc;

use crate::domain::{Cache, KeyedCaches};

/// Name of the small cache
pub const SMALL_CACHE: &str = "small";

/// Name of the big cache
pub const BIG_CACHE: &str = "big";

/// Small cache
#[derive(Debug, Default, Clone, Copy)]
pub struct SmallCache;

impl Cache for SmallCache {
    fn get(&self, key: &str) -> String {
        format!("Resolving {key} from small cache.")
    }
}

/// Big cache
#[derive(Debug, Default, Clone, Copy)]
pub struct BigCache;

impl Cache for BigCache {
    fn get(&self, key: &str) -> String {
        format!("Resolving {key} from big cache.")
    }
}

/// The default mapping: `"small"` and `"big"`
pub fn default_caches() -> KeyedCaches {
    KeyedCaches::new()
        .with(SMALL_CACHE, Arc::new(SmallCache))
        .with(BIG_CACHE, Arc::new(BigCache))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_caches_resolve_by_name() {
        // テスト項目: 既定のキャッシュが名前で解決され、それぞれの値を返す
        // given (前提条件):
        let caches = default_caches();

        // when (操作):
        let small = caches.get(SMALL_CACHE).unwrap().get("signalr");
        let big = caches.get(BIG_CACHE).unwrap().get("signalr");

        // then (期待する結果):
        assert_eq!(small, "Resolving signalr from small cache.");
        assert_eq!(big, "Resolving signalr from big cache.");
        assert_eq!(caches.names(), vec!["big", "small"]);
    }
}
