//! In-memory repository service.
//!
//! Backs a single repository with plain maps and records every call, so the
//! guard can be exercised without a network.

use crate::error::{GitHubError, Result};
use crate::service::RemoteRepository;
use crate::types::{base64_decode, CommitFile, CommitInfo, FileContent, PutFileResult};
use async_trait::async_trait;
use confguard_types::Role;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// A call made against the in-memory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Collaborator permission lookup for a user.
    CollaboratorPermission(String),
    /// Organization membership lookup for a user.
    OrgMembership(String),
    /// Commit metadata read.
    GetCommit(String),
    /// File content read at a ref.
    GetFileContent {
        /// Path read.
        path: String,
        /// Ref read at.
        git_ref: String,
    },
    /// Blob read.
    GetBlob(String),
    /// File write.
    PutFileContent(String),
}

impl Call {
    /// Check if this call is a privilege lookup.
    pub fn is_privilege_lookup(&self) -> bool {
        matches!(self, Call::CollaboratorPermission(_) | Call::OrgMembership(_))
    }
}

/// A write accepted by the in-memory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Path written.
    pub path: String,
    /// Decoded bytes written.
    pub content: Vec<u8>,
    /// Blob SHA the caller expected as base.
    pub expected_sha: String,
    /// Commit message.
    pub message: String,
    /// URL of the commit created.
    pub commit_url: String,
}

/// Thread-safe in-memory repository service for a single repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    owner: String,
    repo: String,

    /// Next commit number for writes.
    next_commit: AtomicU64,

    /// Collaborator permissions by username.
    permissions: RwLock<HashMap<String, String>>,

    /// Organization name and membership roles by username.
    organization: RwLock<Option<String>>,
    memberships: RwLock<HashMap<String, String>>,

    /// Commits by ref.
    commits: RwLock<HashMap<String, CommitInfo>>,

    /// Blob SHA of each (path, ref) pair.
    contents: RwLock<HashMap<(String, String), String>>,

    /// Blob bytes by SHA.
    blobs: RwLock<HashMap<String, Vec<u8>>>,

    /// Current blob SHA of each path.
    heads: RwLock<HashMap<String, String>>,

    /// Paths whose writes are rejected.
    failing_writes: RwLock<HashSet<String>>,

    /// Whether privilege lookups fail with a server error.
    failing_lookups: RwLock<bool>,

    calls: RwLock<Vec<Call>>,
    writes: RwLock<Vec<RecordedWrite>>,
}

impl InMemoryRepository {
    /// Create an empty service for `owner/repo`.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    /// Set the organization the repository belongs to.
    pub fn with_organization(self, org: impl Into<String>) -> Self {
        *self.organization.write() = Some(org.into());
        self
    }

    /// Set a user's collaborator permission.
    pub fn set_permission(&self, user: &str, permission: &str) {
        self.permissions
            .write()
            .insert(user.to_string(), permission.to_string());
    }

    /// Set a user's organization role.
    pub fn set_org_role(&self, user: &str, role: &str) {
        self.memberships
            .write()
            .insert(user.to_string(), role.to_string());
    }

    /// Make every privilege lookup fail.
    pub fn fail_lookups(&self) {
        *self.failing_lookups.write() = true;
    }

    /// Make writes to `path` fail.
    pub fn fail_writes_for(&self, path: &str) {
        self.failing_writes.write().insert(path.to_string());
    }

    /// Register a commit and the files it reports.
    pub fn add_commit(&self, git_ref: &str, files: &[(&str, &str)]) {
        self.add_commit_files(
            git_ref,
            files
                .iter()
                .map(|(path, sha)| CommitFile {
                    path: path.to_string(),
                    sha: Some(sha.to_string()),
                })
                .collect(),
        );
    }

    /// Register a commit with an explicit file list.
    pub fn add_commit_files(&self, git_ref: &str, files: Vec<CommitFile>) {
        let info = CommitInfo {
            sha: git_ref.to_string(),
            html_url: self.commit_url(git_ref),
            files: Some(files),
        };
        self.commits.write().insert(git_ref.to_string(), info);
    }

    /// Register a commit that reports no file list.
    pub fn add_commit_without_files(&self, git_ref: &str) {
        let info = CommitInfo {
            sha: git_ref.to_string(),
            html_url: self.commit_url(git_ref),
            files: None,
        };
        self.commits.write().insert(git_ref.to_string(), info);
    }

    /// Register the content of `path` at `git_ref` under blob `sha`.
    ///
    /// The most recently registered blob becomes the path's current head.
    pub fn add_content(&self, path: &str, git_ref: &str, sha: &str, bytes: &[u8]) {
        self.contents
            .write()
            .insert((path.to_string(), git_ref.to_string()), sha.to_string());
        self.blobs.write().insert(sha.to_string(), bytes.to_vec());
        self.heads.write().insert(path.to_string(), sha.to_string());
    }

    /// Current content of `path`, if known.
    pub fn head_content(&self, path: &str) -> Option<Vec<u8>> {
        let sha = self.heads.read().get(path).cloned()?;
        self.blobs.read().get(&sha).cloned()
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.read().clone()
    }

    /// Number of privilege lookups made so far.
    pub fn privilege_lookups(&self) -> usize {
        self.calls
            .read()
            .iter()
            .filter(|c| c.is_privilege_lookup())
            .count()
    }

    /// All accepted writes, in order.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().clone()
    }

    fn record(&self, call: Call) {
        self.calls.write().push(call);
    }

    fn commit_url(&self, sha: &str) -> String {
        format!("https://github.com/{}/{}/commit/{sha}", self.owner, self.repo)
    }

    fn check_repo(&self, owner: &str, repo: &str) -> Result<()> {
        if owner != self.owner || repo != self.repo {
            return Err(GitHubError::NotFound(format!("repository {owner}/{repo}")));
        }
        Ok(())
    }

    fn check_lookups(&self) -> Result<()> {
        if *self.failing_lookups.read() {
            return Err(GitHubError::Api {
                status: 502,
                message: "Bad Gateway".into(),
            });
        }
        Ok(())
    }

    fn blob(&self, sha: &str) -> Result<FileContent> {
        self.blobs
            .read()
            .get(sha)
            .map(|bytes| FileContent::from_bytes(bytes, sha))
            .ok_or_else(|| GitHubError::NotFound(format!("blob {sha}")))
    }
}

#[async_trait]
impl RemoteRepository for InMemoryRepository {
    async fn get_collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<Role> {
        self.record(Call::CollaboratorPermission(username.to_string()));
        self.check_repo(owner, repo)?;
        self.check_lookups()?;

        self.permissions
            .read()
            .get(username)
            .map(|p| Role::new(p.as_str()))
            .ok_or_else(|| GitHubError::NotFound(format!("collaborator {username}")))
    }

    async fn get_org_membership(&self, org: &str, username: &str) -> Result<Role> {
        self.record(Call::OrgMembership(username.to_string()));
        self.check_lookups()?;

        if self.organization.read().as_deref() != Some(org) {
            return Err(GitHubError::NotFound(format!("organization {org}")));
        }

        self.memberships
            .read()
            .get(username)
            .map(|r| Role::new(r.as_str()))
            .ok_or_else(|| GitHubError::NotFound(format!("membership {username}")))
    }

    async fn get_commit(&self, owner: &str, repo: &str, git_ref: &str) -> Result<CommitInfo> {
        self.record(Call::GetCommit(git_ref.to_string()));
        self.check_repo(owner, repo)?;

        self.commits
            .read()
            .get(git_ref)
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(format!("commit {git_ref}")))
    }

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<FileContent> {
        self.record(Call::GetFileContent {
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        });
        self.check_repo(owner, repo)?;

        let sha = self
            .contents
            .read()
            .get(&(path.to_string(), git_ref.to_string()))
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(format!("{path} at {git_ref}")))?;
        self.blob(&sha)
    }

    async fn get_blob(&self, owner: &str, repo: &str, sha: &str) -> Result<FileContent> {
        self.record(Call::GetBlob(sha.to_string()));
        self.check_repo(owner, repo)?;
        self.blob(sha)
    }

    async fn put_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<PutFileResult> {
        self.record(Call::PutFileContent(path.to_string()));
        self.check_repo(owner, repo)?;

        if self.failing_writes.read().contains(path) {
            return Err(GitHubError::Api {
                status: 500,
                message: format!("write to {path} failed"),
            });
        }

        let mut heads = self.heads.write();
        match heads.get(path) {
            Some(current) if current != expected_sha => {
                return Err(GitHubError::Conflict(format!(
                    "{path} does not match {expected_sha}"
                )));
            }
            None => return Err(GitHubError::NotFound(path.to_string())),
            Some(_) => {}
        }

        let bytes = base64_decode(content)?;
        let n = self.next_commit.fetch_add(1, Ordering::SeqCst) + 1;
        let commit_sha = format!("rollback{n}");
        let blob_sha = format!("{commit_sha}:{path}");

        self.blobs.write().insert(blob_sha.clone(), bytes.clone());
        heads.insert(path.to_string(), blob_sha);

        let commit_url = self.commit_url(&commit_sha);
        self.writes.write().push(RecordedWrite {
            path: path.to_string(),
            content: bytes,
            expected_sha: expected_sha.to_string(),
            message: message.to_string(),
            commit_url: commit_url.clone(),
        });

        Ok(PutFileResult {
            commit_sha,
            commit_url,
        })
    }
}
