use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Time source injected into anything that compares against "now", so
/// expiry is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CacheEntry<T> {
    stored_at: DateTime<Utc>,
    value: T,
}

/// In-memory fetch cache with a fixed time-to-live. Expiry is evaluated
/// against the `now` passed by the caller; entries past their TTL are
/// invisible to lookups and replaced on insert.
pub struct FetchCache<T> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Clone> FetchCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn with_ttl_secs(secs: u64) -> Self {
        Self::new(Duration::seconds(secs.min(i64::MAX as u64) as i64))
    }

    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| now - entry.stored_at < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T, now: DateTime<Utc>) {
        self.entries
            .insert(key.into(), CacheEntry { stored_at: now, value });
    }

    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.stored_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_hit_before_ttl_miss_after() {
        let mut cache = FetchCache::with_ttl_secs(3600);
        cache.insert("r/rust:all", vec![1, 2, 3], at(0));

        assert_eq!(cache.get("r/rust:all", at(3599)), Some(vec![1, 2, 3]));
        assert_eq!(cache.get("r/rust:all", at(3600)), None);
    }

    #[test]
    fn test_insert_refreshes_entry() {
        let mut cache = FetchCache::with_ttl_secs(100);
        cache.insert("key", 1, at(0));
        cache.insert("key", 2, at(90));

        // Refreshed at t=90, so still live at t=150.
        assert_eq!(cache.get("key", at(150)), Some(2));
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = FetchCache::with_ttl_secs(10);
        cache.insert("old", 1, at(0));
        cache.insert("new", 2, at(95));
        cache.purge_expired(at(100));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new", at(100)), Some(2));
    }

    #[test]
    fn test_unknown_key_misses() {
        let cache: FetchCache<u32> = FetchCache::with_ttl_secs(10);
        assert!(cache.is_empty());
        assert_eq!(cache.get("nope", at(0)), None);
    }
}
