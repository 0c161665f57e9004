//! Request-scoped context.

use crate::service::RemoteRepository;
use std::fmt;
use std::sync::Arc;

/// Everything a single event needs to talk to the repository service.
///
/// Built fresh for each event and dropped when the event is done; nothing
/// is shared between events.
#[derive(Clone)]
pub struct RepoContext {
    /// Repository owner login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Organization login, when the repository belongs to one.
    pub organization: Option<String>,
    /// Repository service client.
    pub service: Arc<dyn RemoteRepository>,
}

impl RepoContext {
    /// Creates a context for `owner/repo`.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        service: Arc<dyn RemoteRepository>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            organization: None,
            service,
        }
    }

    /// Sets the organization.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Repository key (e.g., "owner/repo").
    pub fn repo_key(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Debug for RepoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoContext")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}
