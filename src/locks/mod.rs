//! Locking subsystem: lock identity, encoding, and the lock manager.
//!
//! A lock is addressed by a `(category, id)` pair. The storage key is
//! `prefix + category + ":" + id`, where `prefix` is `"L^"` for managers
//! sharing a store partition with other data, or empty for managers bound to
//! a dedicated partition.
//!
//! # Stored Value Format
//!
//! The value at a lock key is a single string: the first character is the
//! [`LockType`] wire code, everything after it is a free-form comment
//! supplied at lock-set time (holder identity, timestamp, etc.). An empty or
//! unrecognized value decodes as [`LockType::NoLock`], which is never
//! intentionally written and signals corrupted data on read.
//!
//! # Lifetime
//!
//! A lock exists exactly as long as its key is present in the store. The
//! store's TTL on the key is the sole release mechanism besides an explicit
//! delete; there is no in-process record of expiry and no unlock protocol.

mod encoding;
mod locker;
mod object;
mod types;


// Re-export public API
pub use locker::{DEFAULT_TTL, Locker};
pub use object::LockObject;
pub use types::LockType;

pub(crate) use encoding::{build_key, build_key_prefix, decode_value, encode_value};
