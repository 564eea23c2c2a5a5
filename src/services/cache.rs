// services/cache.rs
use moka::sync::Cache;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Single-value read cache with a fixed lifetime and manual invalidation.
///
/// Loads are tagged with the generation they started in. A load that was
/// overtaken by `invalidate` is not stored, so a read racing a write cannot
/// put pre-write data back for a full lifetime.
#[derive(Clone)]
pub struct TtlCache<T: Clone + Send + Sync + 'static> {
    name: &'static str,
    slot: Cache<(), T>,
    generation: Arc<Mutex<u64>>,
}

impl<T: Clone + Send + Sync + 'static> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            slot: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            generation: Arc::new(Mutex::new(0)),
        }
    }

    /// Cached value, if present and not yet expired.
    pub fn get(&self) -> Option<T> {
        let value = self.slot.get(&());
        if value.is_some() {
            tracing::debug!("Using cached {}", self.name);
        }
        value
    }

    /// Generation to pass to `put` once a load completes.
    pub fn generation(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores `value` unless the cache was invalidated after `generation`
    /// was taken. Returns whether the value was stored.
    pub fn put(&self, generation: u64, value: T) -> bool {
        let current = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        if *current != generation {
            tracing::debug!("Discarding stale {} load", self.name);
            return false;
        }
        self.slot.insert((), value);
        true
    }

    pub fn invalidate(&self) {
        let mut current = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        *current += 1;
        self.slot.invalidate(&());
        tracing::debug!("Invalidated cached {}", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let cache = TtlCache::new("matches", Duration::from_secs(300));
        assert_eq!(cache.get(), None::<Vec<u32>>);
        assert!(cache.put(cache.generation(), vec![1, 2, 3]));
        assert_eq!(cache.get(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_zero_ttl_never_serves() {
        let cache = TtlCache::new("predictions", Duration::ZERO);
        cache.put(cache.generation(), 7u32);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn test_invalidate_drops_value() {
        let cache = TtlCache::new("predictions", Duration::from_secs(60));
        cache.put(cache.generation(), "rows".to_string());
        cache.invalidate();
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn test_load_overtaken_by_invalidate_is_discarded() {
        let cache = TtlCache::new("predictions", Duration::from_secs(60));
        let started = cache.generation();

        // a write lands while the load is in flight
        cache.invalidate();

        assert!(!cache.put(started, "pre-write rows".to_string()));
        assert_eq!(cache.get(), None);

        assert!(cache.put(cache.generation(), "post-write rows".to_string()));
        assert_eq!(cache.get().as_deref(), Some("post-write rows"));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let cache = TtlCache::new("matches", Duration::from_secs(60));
        let other = cache.clone();
        cache.put(cache.generation(), 1u8);
        assert_eq!(other.get(), Some(1));
        other.invalidate();
        assert_eq!(cache.get(), None);
    }
}
