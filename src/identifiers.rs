//! Identifier types for abstracted dungeon states.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Canonical key of an abstracted game state.
///
/// Two snapshots with the same tile contents, hero position and health bucket
/// produce equal keys. The key is opaque to the agents; only equality and
/// hashing matter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Create a new state key.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_agents::identifiers::StateKey;
    ///
    /// let key = StateKey::new("#@.XHP:2");
    /// assert_eq!(key.as_str(), "#@.XHP:2");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the key into its inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<&str> for StateKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Borrow<str> for StateKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for StateKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for StateKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
