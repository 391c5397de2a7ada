//! Redis-backed key/value store adapter.

use super::KeyValueStore;
use crate::error::{LockerError, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// A [`KeyValueStore`] over a Redis database.
///
/// Wraps a [`ConnectionManager`], which multiplexes one connection and
/// reconnects on failure; cloning the store is cheap and every clone shares
/// the underlying connection. Call-level timeouts, pooling beyond the single
/// multiplexed connection, and retry policy all belong to the host
/// application, not this adapter.
///
/// Locks for separate deployments should live in separate Redis database
/// numbers (select via the connection URL, e.g. `redis://host:6379/2`). A
/// database dedicated to locks lets [`crate::Locker::dedicated`] flush it
/// wholesale instead of scanning for keys.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to a Redis server by URL, e.g. `redis://127.0.0.1:6379/0`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(store_err)?;
        let conn = client.get_connection_manager().await.map_err(store_err)?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection manager.
    pub fn from_connection_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

fn store_err(e: redis::RedisError) -> LockerError {
    LockerError::Store(e.to_string())
}

fn ttl_millis(ttl: Duration) -> u64 {
    // Redis rejects PX 0; clamp to the smallest expiry it accepts.
    (ttl.as_millis() as u64).max(1)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists(key).await.map_err(store_err)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(store_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .pset_ex(key, value, ttl_millis(ttl))
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        // SET NX PX is the atomic insert-or-fail primitive; nil reply means
        // the key already existed.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(reply.is_some())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await.map_err(store_err)?;
        Ok(removed > 0)
    }

    async fn remove_all(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(keys.to_vec()).await.map_err(store_err)?;
        Ok(())
    }

    async fn search_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.keys(pattern).await.map_err(store_err)
    }

    async fn update_expiry(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        let updated: bool = conn
            .pexpire(key, ttl_millis(ttl) as i64)
            .await
            .map_err(store_err)?;
        Ok(updated)
    }

    async fn flush_partition(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}
