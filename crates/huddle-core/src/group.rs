//! Group identity for the huddle hub.
//!
//! A group is addressed by the remainder of a request path after the fixed
//! `/hub/` prefix. Connections whose path does not carry the prefix never
//! become addressable.

use std::fmt;

/// Path prefix that carries the group key.
pub const HUB_PATH_PREFIX: &str = "/hub/";

/// An opaque key identifying one broadcast group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    /// Derive a group key from a request path.
    ///
    /// Returns `None` if the path does not start with [`HUB_PATH_PREFIX`].
    /// The remainder is taken verbatim with no further validation, so an
    /// empty remainder yields a valid (empty) key.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        path.strip_prefix(HUB_PATH_PREFIX)
            .map(|rest| Self(rest.to_string()))
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GroupKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_strips_prefix() {
        let key = GroupKey::from_path("/hub/room1").unwrap();
        assert_eq!(key.as_str(), "room1");
    }

    #[test]
    fn test_from_path_rejects_other_prefixes() {
        assert!(GroupKey::from_path("/chat/room1").is_none());
        assert!(GroupKey::from_path("room1").is_none());
        assert!(GroupKey::from_path("/hub").is_none());
        assert!(GroupKey::from_path("").is_none());
    }

    #[test]
    fn test_remainder_is_taken_verbatim() {
        // No character restrictions, slashes included.
        let key = GroupKey::from_path("/hub/a/b c?x=1").unwrap();
        assert_eq!(key.as_str(), "a/b c?x=1");

        // An empty remainder is still a key.
        let key = GroupKey::from_path("/hub/").unwrap();
        assert_eq!(key.as_str(), "");
    }
}
