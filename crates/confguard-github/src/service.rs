//! The repository service interface.

use crate::error::Result;
use crate::types::{CommitInfo, FileContent, PutFileResult};
use async_trait::async_trait;
use confguard_types::Role;

/// Operations the guard needs from the remote repository service.
///
/// Every call is fallible and may be slow or rate-limited. Implementations
/// own timeout and retry behavior; callers decide how to degrade.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Permission level of `username` as a collaborator on `owner/repo`.
    async fn get_collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<Role>;

    /// Membership role of `username` in `org`.
    async fn get_org_membership(&self, org: &str, username: &str) -> Result<Role>;

    /// Commit metadata at `git_ref`.
    async fn get_commit(&self, owner: &str, repo: &str, git_ref: &str) -> Result<CommitInfo>;

    /// Content and blob SHA of `path` at `git_ref`.
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<FileContent>;

    /// Content of the blob identified by `sha`.
    async fn get_blob(&self, owner: &str, repo: &str, sha: &str) -> Result<FileContent>;

    /// Write base64 `content` to `path`, creating a commit.
    ///
    /// `expected_sha` is the blob SHA the file must currently have.
    async fn put_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<PutFileResult>;
}
