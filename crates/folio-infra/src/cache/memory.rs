//! Process-local cache with per-entry expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Entries are lost on restart and not shared between instances.
#[derive(Default)]
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        {
            let store = self.store.read().await;
            let entry = store.get(key)?;
            if !entry.is_expired(Instant::now()) {
                return Some(entry.value.clone());
            }
        }

        self.store.write().await.remove(key);
        None
    }

    /// Also drops every entry that has already expired, so keys that are never
    /// read again do not pile up.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = ttl.map(|d| now + d);
        let mut store = self.store.write().await;
        store.retain(|_, entry| !entry.is_expired(now));
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_json, set_json};

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryCache::new();
        cache
            .set("short", "v", Some(Duration::from_millis(0)))
            .await
            .unwrap();
        cache.set("long", "v", Some(Duration::from_secs(60))).await.unwrap();

        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.get("long").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_set_evicts_expired_entries() {
        let cache = InMemoryCache::new();
        cache.set("a", "1", Some(Duration::ZERO)).await.unwrap();
        cache.set("b", "2", None).await.unwrap();

        let store = cache.store.read().await;
        assert_eq!(store.len(), 1);
        assert!(store.contains_key("b"));
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = InMemoryCache::new();
        set_json(&cache, "nums", &vec![1u32, 2, 3], None).await.unwrap();

        let nums: Option<Vec<u32>> = get_json(&cache, "nums").await;
        assert_eq!(nums, Some(vec![1, 2, 3]));

        cache.set("bad", "not json", None).await.unwrap();
        let bad: Option<Vec<u32>> = get_json(&cache, "bad").await;
        assert_eq!(bad, None);
    }
}
