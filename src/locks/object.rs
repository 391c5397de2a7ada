//! Read-side lock projection.

use super::types::LockType;
use serde::{Deserialize, Serialize};

/// A snapshot of a lock, assembled on every read.
///
/// Never persisted as a whole and never cached: the backing store is the
/// single source of truth, so a `LockObject` is only as fresh as the query
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockObject {
    /// The manager's namespace prefix at the time of the read.
    pub prefix: String,

    /// The category the lock belongs to.
    pub category: String,

    /// The identifier of the locked resource within its category.
    pub id: String,

    /// The type of lock that is set.
    pub lock_type: LockType,

    /// Free-form annotation supplied at lock-set time, such as the holder's
    /// identity or a timestamp. Empty when none was given.
    pub comment: String,
}

impl LockObject {
    /// Build a lock object from known parts.
    pub fn new(
        prefix: &str,
        category: &str,
        id: &str,
        lock_type: LockType,
        comment: &str,
    ) -> Self {
        Self {
            prefix: prefix.to_string(),
            category: category.to_string(),
            id: id.to_string(),
            lock_type,
            comment: comment.to_string(),
        }
    }

    /// Reconstruct a lock object from a raw stored value.
    pub(crate) fn from_raw(prefix: &str, category: &str, id: &str, raw: &str) -> Self {
        let (lock_type, comment) = super::decode_value(raw);
        Self {
            prefix: prefix.to_string(),
            category: category.to_string(),
            id: id.to_string(),
            lock_type,
            comment,
        }
    }
}

impl std::fmt::Display for LockObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} ({:?}{})",
            self.category,
            self.id,
            self.lock_type,
            if self.comment.is_empty() {
                String::new()
            } else {
                format!(", {}", self.comment)
            }
        )
    }
}
