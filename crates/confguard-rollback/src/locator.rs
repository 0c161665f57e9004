//! Locate the pre-push blob of each guarded file.

use confguard_github::RepoContext;
use confguard_types::GuardList;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A guarded path and the blob it had before the push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedFile {
    /// Repository-relative path.
    pub path: String,
    /// Blob SHA of the file at the before ref.
    pub blob_sha: String,
}

/// Find the blob each guarded file had at `before_ref`.
///
/// Reads the commit at `before_ref` and keeps the guarded entries of its
/// file list, sorted by path. Returns an empty list when the commit cannot
/// be read, reports no files, or touches no guarded path.
///
/// Only files changed by the before commit itself are seen: a guarded file
/// last modified in an older commit is not located and is not rolled back.
/// Entries reported without a blob SHA are skipped.
pub async fn locate_guarded_files(
    ctx: &RepoContext,
    before_ref: &str,
    guard: &GuardList,
) -> Vec<GuardedFile> {
    let commit = match ctx
        .service
        .get_commit(&ctx.owner, &ctx.repo, before_ref)
        .await
    {
        Ok(commit) => commit,
        Err(error) => {
            debug!(git_ref = %before_ref, error = %error, "Commit sha error.");
            return Vec::new();
        }
    };

    let Some(files) = commit.files else {
        info!(git_ref = %before_ref, "No files found in the commit");
        return Vec::new();
    };

    let guarded: BTreeMap<String, String> = files
        .into_iter()
        .filter(|file| guard.is_guarded(&file.path))
        .filter_map(|file| Some((file.path, file.sha?)))
        .collect();

    if guarded.is_empty() {
        info!(git_ref = %before_ref, "No files found that need to be guarded");
    }

    guarded
        .into_iter()
        .map(|(path, blob_sha)| GuardedFile { path, blob_sha })
        .collect()
}
