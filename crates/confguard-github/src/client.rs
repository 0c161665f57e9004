//! GitHub REST client.

use crate::error::{GitHubError, Result};
use crate::service::RemoteRepository;
use crate::types::{
    CommitInfo, FileContent, MembershipResponse, PermissionResponse, PutFileRequest,
    PutFileResponse, PutFileResult,
};
use async_trait::async_trait;
use confguard_types::Role;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_VERSION: &str = "2022-11-28";

/// Client for the GitHub REST API.
///
/// The client is cheaply cloneable; the underlying connection pool is shared.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a new client with the default timeout.
    pub fn new(base_url: impl AsRef<str>, token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a new client with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl AsRef<str>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| GitHubError::InvalidUrl(format!("{}: {e}", base_url.as_ref())))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("confguard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GitHubError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Get authorization header value.
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Contents endpoint for a repository-relative file path.
    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url> {
        self.endpoint(
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path.split('/')),
        )
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        match self.auth_header() {
            Some(auth) => builder.header("Authorization", auth),
            None => builder,
        }
    }

    /// Send a request and parse a JSON response.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.request(builder).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::from_status(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "GET");
        self.send(self.http.get(url)).await
    }
}

#[async_trait]
impl RemoteRepository for GitHubClient {
    async fn get_collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<Role> {
        let url = self.endpoint([
            "repos",
            owner,
            repo,
            "collaborators",
            username,
            "permission",
        ])?;
        let response: PermissionResponse = self.get(url).await?;
        Ok(Role::new(response.permission))
    }

    async fn get_org_membership(&self, org: &str, username: &str) -> Result<Role> {
        let url = self.endpoint(["orgs", org, "memberships", username])?;
        let response: MembershipResponse = self.get(url).await?;
        Ok(Role::new(response.role))
    }

    async fn get_commit(&self, owner: &str, repo: &str, git_ref: &str) -> Result<CommitInfo> {
        let url = self.endpoint(["repos", owner, repo, "commits", git_ref])?;
        self.get(url).await
    }

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<FileContent> {
        let mut url = self.contents_url(owner, repo, path)?;
        url.query_pairs_mut().append_pair("ref", git_ref);
        self.get(url).await
    }

    async fn get_blob(&self, owner: &str, repo: &str, sha: &str) -> Result<FileContent> {
        let url = self.endpoint(["repos", owner, repo, "git", "blobs", sha])?;
        self.get(url).await
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
        let url = self.contents_url(owner, repo, path)?;
        debug!(url = %url, "PUT");

        let body = PutFileRequest {
            message,
            content,
            sha: expected_sha,
        };
        let response: PutFileResponse = self.send(self.http.put(url).json(&body)).await?;
        Ok(response.into())
    }
}
