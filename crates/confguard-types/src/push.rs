//! Push event payload types.
//!
//! Only the fields the guard reads are modelled; everything else in the
//! webhook payload is ignored during deserialization.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// A user as reported in a webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    #[serde(default)]
    pub login: String,
}

/// The pusher block of a push payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pusher {
    /// Username of the account that transmitted the commits.
    #[serde(default)]
    pub name: String,
    /// Email of the pusher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Owner of a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryOwner {
    /// Owner login (user or organization).
    #[serde(default)]
    pub login: String,
}

/// Repository the event happened in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name.
    pub name: String,
    /// Repository owner.
    #[serde(default)]
    pub owner: Option<RepositoryOwner>,
}

impl Repository {
    /// Returns the owner login, if present.
    pub fn owner_login(&self) -> Option<&str> {
        self.owner
            .as_ref()
            .map(|o| o.login.as_str())
            .filter(|login| !login.is_empty())
    }
}

/// Organization the repository belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organization {
    /// Organization login.
    pub login: String,
}

/// A commit listed in a push payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushCommit {
    /// Commit SHA.
    #[serde(default)]
    pub id: String,
    /// Paths added by the commit.
    #[serde(default)]
    pub added: Vec<String>,
    /// Paths modified by the commit.
    #[serde(default)]
    pub modified: Vec<String>,
    /// Paths removed by the commit.
    #[serde(default)]
    pub removed: Vec<String>,
}

/// A push event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushEvent {
    /// Account that triggered the event.
    #[serde(default)]
    pub sender: Option<User>,
    /// Account that pushed the commits.
    #[serde(default)]
    pub pusher: Option<Pusher>,
    /// Commit the ref pointed at before the push.
    #[serde(default)]
    pub before: String,
    /// Commit the ref points at after the push.
    #[serde(default)]
    pub after: String,
    /// Commits included in the push, oldest first.
    #[serde(default)]
    pub commits: Vec<PushCommit>,
    /// Repository that received the push.
    #[serde(default)]
    pub repository: Repository,
    /// Organization of the repository, when owned by one.
    #[serde(default)]
    pub organization: Option<Organization>,
}

impl PushEvent {
    /// Identity that triggered the event.
    pub fn sender(&self) -> Option<Identity> {
        Identity::from_optional(self.sender.as_ref().map(|s| s.login.as_str()))
    }

    /// Identity that pushed the commits.
    pub fn pusher(&self) -> Option<Identity> {
        Identity::from_optional(self.pusher.as_ref().map(|p| p.name.as_str()))
    }

    /// Organization login, if the repository belongs to an organization.
    pub fn organization_login(&self) -> Option<&str> {
        self.organization
            .as_ref()
            .map(|o| o.login.as_str())
            .filter(|login| !login.is_empty())
    }

    /// Collects the added and modified paths of every commit.
    ///
    /// Paths are listed in commit order, added before modified within a
    /// commit. Duplicates are kept.
    pub fn changed_files(&self) -> Vec<String> {
        self.commits
            .iter()
            .flat_map(|commit| commit.added.iter().chain(commit.modified.iter()))
            .cloned()
            .collect()
    }
}
