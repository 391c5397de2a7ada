//! Lock type definitions and their wire codes.

use serde::{Deserialize, Serialize};

/// Type of lock.
///
/// Each variant maps to a fixed single-character code that is stored as the
/// first character of the lock value. The mapping is a stored-data format:
/// changing a code changes what existing deployments read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockType {
    /// Holders other than the lock owner may read the object, but only the
    /// owner may update it.
    ReadOnly,
    /// No party other than the lock owner may read or write the object.
    Exclusive,
    /// Application-defined semantics.
    AppLevel1,
    /// Application-defined semantics.
    AppLevel2,
    /// Application-defined semantics.
    AppLevel3,
    /// Sentinel for the absence of a lock. Never intentionally persisted;
    /// recognized on read so corrupted values decode to something total.
    NoLock,
}

impl LockType {
    /// The single-character wire code stored as the first character of a
    /// lock value.
    pub fn code(&self) -> char {
        match self {
            LockType::ReadOnly => 'R',
            LockType::Exclusive => 'X',
            LockType::AppLevel1 => 'A',
            LockType::AppLevel2 => 'B',
            LockType::AppLevel3 => 'C',
            LockType::NoLock => '0',
        }
    }

    /// Map a wire code back to a lock type.
    ///
    /// Total: unrecognized codes yield [`LockType::NoLock`] rather than an
    /// error, since a stored value we cannot interpret is indistinguishable
    /// from no lock for every caller decision that matters.
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => LockType::ReadOnly,
            'X' => LockType::Exclusive,
            'A' => LockType::AppLevel1,
            'B' => LockType::AppLevel2,
            'C' => LockType::AppLevel3,
            '0' => LockType::NoLock,
            _ => LockType::NoLock,
        }
    }
}
