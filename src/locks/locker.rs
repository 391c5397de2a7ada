//! The lock manager: binds a store adapter to a namespace and default TTL.

use super::object::LockObject;
use super::types::LockType;
use super::{build_key, build_key_prefix, encode_value};
use crate::error::{LockerError, Result};
use crate::store::KeyValueStore;
use std::time::Duration;
use tracing::{debug, warn};

/// Default lock lifetime applied when a call does not override it: 300 seconds.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Namespace prefix for managers sharing a store partition with other data.
const SHARED_PREFIX: &str = "L^";

/// A general-purpose distributed lock manager over a TTL key/value store.
///
/// The manager holds no state about which locks exist; every operation is a
/// fresh round trip to the injected store, which is the single source of
/// truth and the sole point of concurrency control. Any number of manager
/// instances across any number of processes may operate on the same
/// namespace concurrently.
///
/// Two construction modes:
/// - [`Locker::new`] for a store partition shared with other data; keys are
///   namespaced under the `"L^"` prefix.
/// - [`Locker::dedicated`] for a partition holding nothing but locks; keys
///   carry no prefix and [`Locker::flush_all_locks`] can clear the whole
///   partition instead of scanning for keys.
///
/// # Locking Semantics
///
/// [`Locker::set_lock`] is an unconditional overwrite: concurrent writers to
/// the same key race last-writer-wins, and neither learns that the other
/// also "succeeded". This gives lock *visibility*, not arbitration. When
/// real mutual exclusion is required, acquire through
/// [`Locker::try_set_lock`], which uses the store's atomic insert-or-fail
/// primitive and reports a collision as `Ok(false)`.
pub struct Locker<S: KeyValueStore> {
    store: S,
    prefix: &'static str,
    default_ttl: Duration,
    dedicated: bool,
}

impl<S: KeyValueStore> Locker<S> {
    /// Create a manager over a store partition shared with other uses.
    ///
    /// Lock keys are namespaced under the `"L^"` prefix so bulk operations
    /// never touch non-lock keys.
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: SHARED_PREFIX,
            default_ttl: DEFAULT_TTL,
            dedicated: false,
        }
    }

    /// Create a manager over a partition dedicated solely to locks.
    ///
    /// The namespace prefix is empty, since everything in the partition is a
    /// lock entry, and [`Locker::flush_all_locks`] takes the fast
    /// whole-partition path.
    pub fn dedicated(store: S) -> Self {
        Self {
            store,
            prefix: "",
            default_ttl: DEFAULT_TTL,
            dedicated: true,
        }
    }

    /// The namespace prefix this manager prepends to every lock key.
    pub fn prefix(&self) -> &str {
        self.prefix
    }

    /// Borrow the underlying store adapter.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The default lock lifetime applied when a call omits a duration.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Change the default lock lifetime.
    pub fn set_default_ttl(&mut self, ttl: Duration) {
        self.default_ttl = ttl;
    }

    /// Set a lock for the given category and id.
    ///
    /// Writes unconditionally: an existing lock at the same key is
    /// overwritten, including its TTL. `ttl` of `None` selects the manager's
    /// default. The comment travels with the lock and comes back on reads;
    /// use it for holder identity, timestamps, or anything else the calling
    /// application finds useful.
    ///
    /// Returns `Ok(true)` when the store accepted the write.
    pub async fn set_lock(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        lock_type: LockType,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        validate(category, id)?;
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.store
            .set(
                &build_key(self.prefix, category, id),
                &encode_value(lock_type, comment),
                ttl,
            )
            .await?;
        Ok(true)
    }

    /// Set a lock with the duration given as a count of milliseconds.
    ///
    /// `ttl_ms` of `0` selects the manager's default TTL. Otherwise behaves
    /// exactly like [`Locker::set_lock`].
    pub async fn set_lock_ms(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        lock_type: LockType,
        ttl_ms: u64,
    ) -> Result<bool> {
        let ttl = if ttl_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(ttl_ms))
        };
        self.set_lock(category, id, comment, lock_type, ttl).await
    }

    /// Set a lock only if no lock currently exists at the key.
    ///
    /// This is the arbitrated acquisition path: the store's atomic
    /// insert-or-fail primitive decides a race between concurrent callers,
    /// and the loser gets `Ok(false)`. Use this instead of
    /// [`Locker::set_lock`] when an [`LockType::Exclusive`] lock must
    /// actually exclude.
    pub async fn try_set_lock(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        lock_type: LockType,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        validate(category, id)?;
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.store
            .set_if_absent(
                &build_key(self.prefix, category, id),
                &encode_value(lock_type, comment),
                ttl,
            )
            .await
    }

    /// Set an [`LockType::Exclusive`] lock. See [`Locker::set_lock`].
    pub async fn set_lock_exclusive(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.set_lock(category, id, comment, LockType::Exclusive, ttl)
            .await
    }

    /// Set a [`LockType::ReadOnly`] lock. See [`Locker::set_lock`].
    pub async fn set_lock_read_only(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.set_lock(category, id, comment, LockType::ReadOnly, ttl)
            .await
    }

    /// Set an [`LockType::AppLevel1`] lock. See [`Locker::set_lock`].
    pub async fn set_lock_app_level1(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.set_lock(category, id, comment, LockType::AppLevel1, ttl)
            .await
    }

    /// Set an [`LockType::AppLevel2`] lock. See [`Locker::set_lock`].
    pub async fn set_lock_app_level2(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.set_lock(category, id, comment, LockType::AppLevel2, ttl)
            .await
    }

    /// Set an [`LockType::AppLevel3`] lock. See [`Locker::set_lock`].
    pub async fn set_lock_app_level3(
        &self,
        category: &str,
        id: &str,
        comment: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.set_lock(category, id, comment, LockType::AppLevel3, ttl)
            .await
    }

    /// Check whether a lock exists for the given category and id.
    ///
    /// Faster than [`Locker::get_lock`] when the caller only has one kind of
    /// lock and does not need the type or comment.
    pub async fn exists(&self, category: &str, id: &str) -> Result<bool> {
        validate(category, id)?;
        self.store
            .exists(&build_key(self.prefix, category, id))
            .await
    }

    /// Retrieve the lock for the given category and id, if one is set.
    ///
    /// Returns `Ok(None)` when no lock exists. A lock whose stored value
    /// decodes to [`LockType::NoLock`] is returned as-is but logged, since
    /// that type is never written by this library and indicates a corrupted
    /// or foreign value at the key.
    pub async fn get_lock(&self, category: &str, id: &str) -> Result<Option<LockObject>> {
        validate(category, id)?;
        let raw = match self.store.get(&build_key(self.prefix, category, id)).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let lock = LockObject::from_raw(self.prefix, category, id, &raw);
        if lock.lock_type == LockType::NoLock {
            warn!(
                category,
                id, "stored lock value has no recognizable type code"
            );
        }
        Ok(Some(lock))
    }

    /// Retrieve information about a lock. Alias of [`Locker::get_lock`].
    pub async fn lock_info(&self, category: &str, id: &str) -> Result<Option<LockObject>> {
        self.get_lock(category, id).await
    }

    /// Delete the specified lock.
    ///
    /// Returns `Ok(false)` when the lock did not exist.
    pub async fn delete_lock(&self, category: &str, id: &str) -> Result<bool> {
        validate(category, id)?;
        self.store
            .remove(&build_key(self.prefix, category, id))
            .await
    }

    /// Count the locks currently set under the given category.
    ///
    /// Linear in the number of keys in the store partition: the category
    /// prefix is matched by scanning the keyspace.
    pub async fn lock_count(&self, category: &str) -> Result<usize> {
        validate_category(category)?;
        let pattern = format!("{}*", build_key_prefix(self.prefix, category));
        let keys = self.store.search_keys(&pattern).await?;
        Ok(keys.len())
    }

    /// Remove every lock under the given category.
    ///
    /// Best-effort bulk delete: locks expiring concurrently with the scan
    /// are simply not there to remove.
    pub async fn delete_all_locks_for_category(&self, category: &str) -> Result<()> {
        validate_category(category)?;
        let pattern = format!("{}*", build_key_prefix(self.prefix, category));
        let keys = self.store.search_keys(&pattern).await?;
        debug!(category, count = keys.len(), "deleting all locks in category");
        self.store.remove_all(&keys).await
    }

    /// Remove every lock this manager can see in its namespace.
    ///
    /// On a dedicated partition this flushes the partition outright, which
    /// is the documented reason to give locks their own partition; otherwise
    /// it falls back to scanning for every key under the manager's prefix.
    pub async fn flush_all_locks(&self) -> Result<()> {
        if self.dedicated {
            debug!("flushing dedicated lock partition");
            return self.store.flush_partition().await;
        }

        let pattern = format!("{}*", self.prefix);
        let keys = self.store.search_keys(&pattern).await?;
        debug!(count = keys.len(), "deleting all locks under prefix");
        self.store.remove_all(&keys).await
    }

    /// Reset a lock's remaining lifetime to exactly `ttl`.
    ///
    /// An absolute reset, not additive: the lock expires `ttl` from now no
    /// matter how much time it had left. Returns `Ok(false)` when no lock
    /// exists at the key.
    pub async fn update_lock_expiration_time(
        &self,
        category: &str,
        id: &str,
        ttl: Duration,
    ) -> Result<bool> {
        validate(category, id)?;
        self.store
            .update_expiry(&build_key(self.prefix, category, id), ttl)
            .await
    }
}

/// Reject empty categories and ids before any store round trip.
fn validate(category: &str, id: &str) -> Result<()> {
    validate_category(category)?;
    if id.is_empty() {
        return Err(LockerError::InvalidArgument(
            "lock id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.is_empty() {
        return Err(LockerError::InvalidArgument(
            "lock category must not be empty".to_string(),
        ));
    }
    Ok(())
}
