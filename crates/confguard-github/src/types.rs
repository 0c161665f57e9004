//! Response and request types for repository service operations.

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFile {
    /// Repository-relative path.
    #[serde(rename = "filename")]
    pub path: String,
    /// Blob SHA of the file at this commit. Absent for entries such as
    /// submodule changes.
    #[serde(default)]
    pub sha: Option<String>,
}

/// Commit metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit SHA.
    #[serde(default)]
    pub sha: String,
    /// URL to view the commit in the web UI.
    #[serde(default)]
    pub html_url: String,
    /// Files touched by the commit, when reported.
    #[serde(default)]
    pub files: Option<Vec<CommitFile>>,
}

/// File content as returned by the contents and blob endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Base64-encoded content. May contain line breaks.
    #[serde(default)]
    pub content: String,
    /// Blob SHA of the content.
    pub sha: String,
}

impl FileContent {
    /// Builds a content record from raw bytes.
    pub fn from_bytes(bytes: &[u8], sha: impl Into<String>) -> Self {
        Self {
            content: base64_encode(bytes),
            sha: sha.into(),
        }
    }

    /// Decodes the content to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64_decode(&self.content)
    }
}

/// Result of a file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutFileResult {
    /// SHA of the commit created by the write.
    pub commit_sha: String,
    /// URL to view the new commit.
    pub commit_url: String,
}

/// Organization membership.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MembershipResponse {
    pub role: String,
}

/// Collaborator permission level.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PermissionResponse {
    pub permission: String,
}

/// Body of a contents write.
#[derive(Debug, Serialize)]
pub(crate) struct PutFileRequest<'a> {
    pub message: &'a str,
    pub content: &'a str,
    pub sha: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PutFileCommit {
    pub sha: String,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PutFileResponse {
    pub commit: PutFileCommit,
}

impl From<PutFileResponse> for PutFileResult {
    fn from(response: PutFileResponse) -> Self {
        Self {
            commit_sha: response.commit.sha,
            commit_url: response.commit.html_url,
        }
    }
}

/// Base64-encode bytes without line breaks.
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 that may be wrapped across lines.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_wrapped_content() {
        // The contents API wraps base64 at 60 columns.
        let content = FileContent {
            content: "a2V5OiB2YWx1\nZQo=\n".into(),
            sha: "abc".into(),
        };
        assert_eq!(content.decode().unwrap(), b"key: value\n");
    }

    #[test]
    fn test_decode_invalid_content() {
        let content = FileContent {
            content: "***".into(),
            sha: "abc".into(),
        };
        assert!(content.decode().is_err());
    }

    #[test]
    fn test_commit_info_files_optional() {
        let info: CommitInfo = serde_json::from_value(json!({
            "sha": "abc",
            "html_url": "https://github.com/acme/config/commit/abc"
        }))
        .unwrap();
        assert!(info.files.is_none());

        let info: CommitInfo = serde_json::from_value(json!({
            "sha": "abc",
            "html_url": "https://github.com/acme/config/commit/abc",
            "files": [{ "filename": "config.yml", "sha": "blob1", "status": "modified" }]
        }))
        .unwrap();
        let files = info.files.unwrap();
        assert_eq!(files[0].path, "config.yml");
        assert_eq!(files[0].sha.as_deref(), Some("blob1"));
    }
}
