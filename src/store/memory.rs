//! In-memory key/value store with TTL expiry.

use super::KeyValueStore;
use crate::error::{LockerError, Result};
use async_trait::async_trait;
use globset::Glob;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// An in-process [`KeyValueStore`] for tests and embedded single-process use.
///
/// Expiry mimics a real TTL store: expired entries are dropped lazily when
/// an operation touches the map, so an expiry is not observable until the
/// next query — exactly the visibility a remote store gives.
///
/// Deadlines use `tokio::time::Instant`, so expiry behavior is fully
/// deterministic under tokio's paused test clock.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry whose deadline has passed.
    fn purge_expired(entries: &mut HashMap<String, Entry>) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // No operation holds the guard across an await, so a poisoned mutex
        // can only come from a panicking test; keep the map usable.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut entries = self.lock_entries();
        Self::purge_expired(&mut entries);
        Ok(entries.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.lock_entries();
        Self::purge_expired(&mut entries);
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.lock_entries();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut entries = self.lock_entries();
        Self::purge_expired(&mut entries);
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(true)
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.lock_entries();
        Self::purge_expired(&mut entries);
        Ok(entries.remove(key).is_some())
    }

    async fn remove_all(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.lock_entries();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn search_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = Glob::new(pattern)
            .map_err(|e| LockerError::Pattern(e.to_string()))?
            .compile_matcher();

        let mut entries = self.lock_entries();
        Self::purge_expired(&mut entries);
        Ok(entries
            .keys()
            .filter(|key| matcher.is_match(key))
            .cloned()
            .collect())
    }

    async fn update_expiry(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut entries = self.lock_entries();
        Self::purge_expired(&mut entries);
        match entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = Instant::now() + ttl;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn flush_partition(&self) -> Result<()> {
        self.lock_entries().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("a", "1", Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
        assert!(store.exists("a").await.unwrap());
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert!(!store.exists("missing").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let store = MemoryStore::new();
        store.set("a", "1", Duration::from_secs(2)).await.unwrap();
        assert!(store.exists("a").await.unwrap());

        time::advance(Duration::from_millis(2100)).await;
        assert!(!store.exists("a").await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let store = MemoryStore::new();
        store.set("a", "1", Duration::from_secs(10)).await.unwrap();
        store.set("a", "2", Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn set_if_absent_refuses_live_key() {
        let store = MemoryStore::new();
        assert!(
            store
                .set_if_absent("a", "1", Duration::from_secs(10))
                .await
                .unwrap()
        );
        assert!(
            !store
                .set_if_absent("a", "2", Duration::from_secs(10))
                .await
                .unwrap()
        );
        // First writer's value is untouched
        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn set_if_absent_succeeds_after_expiry() {
        let store = MemoryStore::new();
        store.set("a", "1", Duration::from_secs(1)).await.unwrap();
        time::advance(Duration::from_millis(1100)).await;
        assert!(
            store
                .set_if_absent("a", "2", Duration::from_secs(10))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn remove_reports_presence() {
        let store = MemoryStore::new();
        store.set("a", "1", Duration::from_secs(10)).await.unwrap();
        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
    }

    #[tokio::test]
    async fn search_keys_matches_prefix_glob() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(10);
        store.set("L^person:1", "X", ttl).await.unwrap();
        store.set("L^person:2", "X", ttl).await.unwrap();
        store.set("L^invoice:1", "X", ttl).await.unwrap();

        let mut keys = store.search_keys("L^person:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["L^person:1", "L^person:2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn update_expiry_is_absolute_reset() {
        let store = MemoryStore::new();
        store.set("a", "1", Duration::from_secs(2)).await.unwrap();

        time::advance(Duration::from_secs(1)).await;
        assert!(store.update_expiry("a", Duration::from_secs(5)).await.unwrap());

        // Past the original deadline, but within the reset one
        time::advance(Duration::from_secs(4)).await;
        assert!(store.exists("a").await.unwrap());

        time::advance(Duration::from_millis(1100)).await;
        assert!(!store.exists("a").await.unwrap());
    }

    #[tokio::test]
    async fn update_expiry_on_missing_key_is_false() {
        let store = MemoryStore::new();
        assert!(
            !store
                .update_expiry("missing", Duration::from_secs(5))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn flush_partition_clears_everything() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(10);
        store.set("a", "1", ttl).await.unwrap();
        store.set("b", "2", ttl).await.unwrap();
        store.flush_partition().await.unwrap();
        assert!(store.search_keys("*").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_glob_surfaces_pattern_error() {
        let store = MemoryStore::new();
        let err = store.search_keys("a{b").await.unwrap_err();
        assert!(matches!(err, LockerError::Pattern(_)));
    }
}
