use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Time source for [`TtlCache`]. Production uses [`SystemClock`];
/// tests inject a manual clock.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
    inserted_at: Instant,
}

/// Bounded in-process cache with per-entry TTL.
///
/// When the capacity is reached, expired entries are dropped first; if
/// none are expired, the oldest insertion is evicted. Not shared across
/// instances, so only suitable for convenience data (settings snapshots,
/// short-lived verification codes).
pub struct TtlCache<K, V, C = SystemClock> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    capacity: usize,
    clock: C,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V, SystemClock> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, SystemClock)
    }
}

impl<K: Eq + Hash + Clone, V, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(ttl: Duration, capacity: usize, clock: C) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
            clock,
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let now = self.clock.now();
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.evict_one(now);
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
                inserted_at: now,
            },
        );
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) => entry.expires_at <= now,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_one(&mut self, now: Instant) {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();

        if !expired.is_empty() {
            for k in expired {
                self.entries.remove(&k);
            }
            return;
        }

        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.inserted_at)
            .map(|(k, _)| k.clone())
        {
            self.entries.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock {
        base: Instant,
        offset_ms: Rc<Cell<u64>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset_ms: Rc::new(Cell::new(0)),
            }
        }

        fn advance(&self, ms: u64) {
            self.offset_ms.set(self.offset_ms.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + Duration::from_millis(self.offset_ms.get())
        }
    }

    #[test]
    fn entry_expires_after_ttl() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_millis(100), 10, clock.clone());

        cache.insert("otp:+33600000001", "482913");
        assert_eq!(cache.get(&"otp:+33600000001"), Some(&"482913"));

        clock.advance(101);
        assert_eq!(cache.get(&"otp:+33600000001"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_overwrites_and_refreshes_ttl() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_millis(100), 10, clock.clone());

        cache.insert("k", 1);
        clock.advance(80);
        cache.insert("k", 2);
        clock.advance(80);

        // 160ms after the first insert but only 80ms after the refresh
        assert_eq!(cache.get(&"k"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_evicts_oldest_when_nothing_expired() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_secs(60), 2, clock.clone());

        cache.insert("a", 1);
        clock.advance(1);
        cache.insert("b", 2);
        clock.advance(1);
        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn capacity_prefers_dropping_expired_entries() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_millis(50), 2, clock.clone());

        cache.insert("stale", 1);
        clock.advance(60);
        cache.insert("fresh", 2);
        cache.insert("newer", 3);

        assert_eq!(cache.get(&"fresh"), Some(&2));
        assert_eq!(cache.get(&"newer"), Some(&3));
    }
}
