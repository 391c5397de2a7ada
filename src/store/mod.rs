//! Store adapters: the key/value seam the lock manager is generic over.
//!
//! The manager never talks to a concrete client; it issues operations
//! through [`KeyValueStore`], which any linearizable key/value service with
//! native key expiry can implement. Two adapters ship with the crate:
//! [`MemoryStore`] for tests and embedded single-process use, and
//! [`RedisStore`] for the intended distributed deployment.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The backing key/value store consumed by the lock manager.
///
/// Implementations provide per-key linearizability and TTL expiry; nothing
/// more is assumed. All failures surface as [`crate::LockerError::Store`];
/// this layer adds no retry or backoff.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Whether a key is present.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Fetch the value at a key, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value with the given expiry, overwriting any existing value
    /// and its remaining TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Write a value with the given expiry only if the key is absent.
    ///
    /// Must be atomic with respect to concurrent writers; this primitive is
    /// what makes arbitrated lock acquisition possible. Returns `false` when
    /// the key already exists.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Delete a key. Returns `false` when the key was not present.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// Delete every key in the given list. Keys that no longer exist are
    /// skipped silently.
    async fn remove_all(&self, keys: &[String]) -> Result<()>;

    /// Return every key matching a glob pattern, e.g. `L^person:*`.
    async fn search_keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Reset a key's remaining lifetime to exactly `ttl`. Returns `false`
    /// when the key does not exist.
    async fn update_expiry(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Delete everything in the store partition.
    ///
    /// Only invoked by managers configured over a dedicated lock partition.
    async fn flush_partition(&self) -> Result<()>;
}
