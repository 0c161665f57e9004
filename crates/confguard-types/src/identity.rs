//! User identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user identity on the repository service.
///
/// An identity is nothing more than a username; two identities are equal
/// iff their usernames are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Creates a new identity from a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Creates an identity, treating an empty or missing username as absent.
    pub fn from_optional(username: Option<&str>) -> Option<Self> {
        username.filter(|name| !name.is_empty()).map(Self::new)
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(username: &str) -> Self {
        Self::new(username)
    }
}

impl From<String> for Identity {
    fn from(username: String) -> Self {
        Self(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality_is_string_equality() {
        assert_eq!(Identity::new("alice"), Identity::from("alice"));
        assert_ne!(Identity::new("alice"), Identity::new("Alice"));
    }

    #[test]
    fn test_identity_from_optional() {
        assert_eq!(Identity::from_optional(Some("bob")), Some(Identity::new("bob")));
        assert_eq!(Identity::from_optional(Some("")), None);
        assert_eq!(Identity::from_optional(None), None);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(format!("{}", Identity::new("carol")), "carol");
    }
}
