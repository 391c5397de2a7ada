//! Pure transformations between lock identity and storage keys, and between
//! lock metadata and stored values.
//!
//! Nothing in this module touches the store; these are the only functions
//! that define the on-store formats.

use super::types::LockType;

/// Build the key prefix for a category: `prefix + category + ":"`.
///
/// Used both for single-key construction and as the literal search prefix
/// for category-scoped bulk operations, so categories must not lexically
/// collide with each other through the `":"` delimiter (caller
/// responsibility).
pub(crate) fn build_key_prefix(prefix: &str, category: &str) -> String {
    format!("{}{}:", prefix, category)
}

/// Build the full storage key for a lock: `prefix + category + ":" + id`.
pub(crate) fn build_key(prefix: &str, category: &str, id: &str) -> String {
    format!("{}{}:{}", prefix, category, id)
}

/// Pack a lock type and comment into the stored value: the one-character
/// wire code followed by the comment verbatim.
///
/// The comment is not escaped or length-limited; callers must not embed
/// control semantics in it.
pub(crate) fn encode_value(lock_type: LockType, comment: &str) -> String {
    format!("{}{}", lock_type.code(), comment)
}

/// Unpack a stored value into its lock type and comment.
///
/// The empty string decodes to `(NoLock, "")`. An unrecognized first
/// character decodes to `(NoLock, remainder)` — since `NoLock` is never
/// intentionally written, callers should treat that as a corruption signal.
pub(crate) fn decode_value(raw: &str) -> (LockType, String) {
    let mut chars = raw.chars();
    match chars.next() {
        Some(code) => (LockType::from_code(code), chars.collect()),
        None => (LockType::NoLock, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefix_plus_id() {
        assert_eq!(
            build_key("L^", "person", "42"),
            format!("{}{}", build_key_prefix("L^", "person"), "42")
        );
        assert_eq!(build_key("L^", "person", "42"), "L^person:42");
    }

    #[test]
    fn empty_prefix_builds_bare_keys() {
        assert_eq!(build_key_prefix("", "person"), "person:");
        assert_eq!(build_key("", "person", "42"), "person:42");
    }

    #[test]
    fn distinct_categories_build_distinct_prefixes() {
        assert_ne!(
            build_key_prefix("L^", "person"),
            build_key_prefix("L^", "invoice")
        );
    }

    #[test]
    fn encode_prepends_type_code() {
        assert_eq!(encode_value(LockType::Exclusive, "alice"), "Xalice");
        assert_eq!(encode_value(LockType::ReadOnly, ""), "R");
    }

    #[test]
    fn decode_round_trips_every_type() {
        let all = [
            LockType::ReadOnly,
            LockType::Exclusive,
            LockType::AppLevel1,
            LockType::AppLevel2,
            LockType::AppLevel3,
            LockType::NoLock,
        ];
        for lock_type in all {
            for comment in ["", "alice", "set at 2024-01-01T00:00:00Z", "a:b*c"] {
                assert_eq!(
                    decode_value(&encode_value(lock_type, comment)),
                    (lock_type, comment.to_string())
                );
            }
        }
    }

    #[test]
    fn decode_empty_string_is_no_lock() {
        assert_eq!(decode_value(""), (LockType::NoLock, String::new()));
    }

    #[test]
    fn decode_unrecognized_single_char_is_no_lock() {
        assert_eq!(decode_value("Z"), (LockType::NoLock, String::new()));
        assert_eq!(decode_value("?"), (LockType::NoLock, String::new()));
    }

    #[test]
    fn decode_unrecognized_code_keeps_remainder_as_comment() {
        assert_eq!(
            decode_value("Zcorrupt"),
            (LockType::NoLock, "corrupt".to_string())
        );
    }

    #[test]
    fn decode_length_one_value_has_empty_comment() {
        assert_eq!(decode_value("X"), (LockType::Exclusive, String::new()));
    }
}
