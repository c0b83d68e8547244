//! Single-slot TTL cache guarding each expensive upstream call.
//!
//! One slot per key; the key space is the fixed asset universe (or a unit
//! key for global sources), so there is no eviction policy. Reads past the
//! TTL are still reachable through [`TtlCache::get_stale`] for the
//! soft-expiry fallback: serving the last good value when a refresh fails.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

/// Thread-safe key → (value, timestamp) cache with a fixed TTL.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries stay fresh for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Value for `key` if it is still inside the TTL window.
    #[must_use]
    pub fn get_fresh(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Last stored value for `key` regardless of age.
    #[must_use]
    pub fn get_stale(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).map(|e| e.value.clone())
    }

    /// Store `value` under `key` with the current instant, overwriting any
    /// prior slot.
    pub fn put(&self, key: K, value: V) {
        self.entries.write().insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_value_is_served_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("btc", 1);

        assert_eq!(cache.get_fresh(&"btc"), Some(1));
        assert_eq!(cache.get_fresh(&"btc"), Some(1));
    }

    #[test]
    fn expired_value_is_not_fresh_but_still_stale_readable() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.put("btc", 1);

        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get_fresh(&"btc"), None);
        assert_eq!(cache.get_stale(&"btc"), Some(1));
    }

    #[test]
    fn put_overwrites_the_slot() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("btc", 1);
        cache.put("btc", 2);

        assert_eq!(cache.get_fresh(&"btc"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_key_is_absent_everywhere() {
        let cache: TtlCache<&str, i32> = TtlCache::new(Duration::from_secs(60));

        assert!(cache.is_empty());
        assert_eq!(cache.get_fresh(&"eth"), None);
        assert_eq!(cache.get_stale(&"eth"), None);
    }

    #[test]
    fn keys_are_independent_slots() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("btc", 1);
        cache.put("eth", 2);

        assert_eq!(cache.get_fresh(&"btc"), Some(1));
        assert_eq!(cache.get_fresh(&"eth"), Some(2));
        assert_eq!(cache.len(), 2);
    }
}
