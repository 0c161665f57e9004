//! Privilege signals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role string reported by the repository service.
///
/// Roles come from two independent sources: the collaborator permission on
/// a repository (`admin`, `write`, `read`, ...) and the membership role in an
/// organization (`admin`, `billing_manager`, `member`, ...). Roles carry no
/// ordering; `admin` is not "more" than `write` here. A failed or empty
/// lookup is represented by [`Role::none`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Sentinel role for missing or failed lookups.
    pub const NONE: &'static str = "none";

    /// Creates a role from its string form.
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The `"none"` sentinel role.
    pub fn none() -> Self {
        Self(Self::NONE.to_string())
    }

    /// Check if this is the `"none"` sentinel.
    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE
    }

    /// Returns the role string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::none()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self(role)
    }
}
