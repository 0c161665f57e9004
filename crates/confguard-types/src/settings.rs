//! Guard settings: the allow-list policy and the guarded file list.

use crate::error::Result;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Settings supplied with every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    /// Roles that may modify guarded files.
    #[validate(custom(function = "validate_roles"))]
    pub roles_allowed_to_modify: Vec<String>,
    /// Repository-relative paths that need protection.
    #[validate(custom(function = "validate_paths"))]
    pub files_that_need_guarded: Vec<String>,
}

impl PluginSettings {
    /// Validate the settings, returning them on success.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

fn validate_roles(roles: &[String]) -> std::result::Result<(), ValidationError> {
    if roles.iter().any(|r| r.trim().is_empty()) {
        return Err(ValidationError::new("empty_role")
            .with_message("roles must be non-empty strings".into()));
    }
    Ok(())
}

fn validate_paths(paths: &[String]) -> std::result::Result<(), ValidationError> {
    for path in paths {
        if path.trim().is_empty() {
            return Err(ValidationError::new("empty_path")
                .with_message("guarded paths must be non-empty strings".into()));
        }
        if path.starts_with('/') {
            return Err(ValidationError::new("absolute_path")
                .with_message("guarded paths must be repository-relative".into()));
        }
    }
    Ok(())
}

/// Roles considered sufficient to modify guarded files.
///
/// Membership is exact string inclusion; no role implies another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    roles: Vec<String>,
}

impl AuthorizationPolicy {
    /// Creates a policy from an ordered list of roles.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a role is in the allow-list.
    pub fn allows(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }

    /// The configured roles, in order.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

impl From<&PluginSettings> for AuthorizationPolicy {
    fn from(settings: &PluginSettings) -> Self {
        Self::new(settings.roles_allowed_to_modify.iter().cloned())
    }
}

/// Repository paths that require protection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardList {
    paths: Vec<String>,
}

impl GuardList {
    /// Creates a guard list.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a path is guarded (exact match).
    pub fn is_guarded(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Check if any of the given paths is guarded.
    pub fn intersects<S: AsRef<str>>(&self, changes: &[S]) -> bool {
        changes.iter().any(|c| self.is_guarded(c.as_ref()))
    }

    /// Check if nothing is guarded.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The guarded paths.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl From<&PluginSettings> for GuardList {
    fn from(settings: &PluginSettings) -> Self {
        Self::new(settings.files_that_need_guarded.iter().cloned())
    }
}
