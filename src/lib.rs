//! Locker: lightweight distributed resource locking over a TTL key/value store.
//!
//! Independent processes coordinate access to shared logical resources,
//! identified by a `(category, id)` pair, without a central lock-manager
//! process: every client talks directly to a shared key/value store, whose
//! atomic key insertion and TTL expiry stand in for an arbitration service.
//! A lock is released either explicitly or by its TTL running out; a crashed
//! holder never leaves a permanent lock behind.
//!
//! The manager is generic over the [`store::KeyValueStore`] seam. The crate
//! ships [`store::RedisStore`] for distributed deployments and
//! [`store::MemoryStore`] for tests and single-process use.
//!
//! ```
//! use locker::{Locker, LockType, store::MemoryStore};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> locker::Result<()> {
//! let locker = Locker::new(MemoryStore::new());
//!
//! locker
//!     .set_lock_exclusive("person", "42", "alice", Some(Duration::from_secs(30)))
//!     .await?;
//!
//! let lock = locker.get_lock("person", "42").await?.expect("just set");
//! assert_eq!(lock.lock_type, LockType::Exclusive);
//! assert_eq!(lock.comment, "alice");
//!
//! locker.delete_lock("person", "42").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Note that [`Locker::set_lock`] and its per-type wrappers overwrite
//! unconditionally: they make a lock *visible*, they do not arbitrate
//! between racing writers. Acquire through [`Locker::try_set_lock`] when the
//! store must referee.

pub mod error;
pub mod locks;
pub mod store;

pub use error::{LockerError, Result};
pub use locks::{DEFAULT_TTL, LockObject, LockType, Locker};
