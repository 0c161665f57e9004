//! Restore guarded files to their pre-push content.

use crate::locator::{locate_guarded_files, GuardedFile};
use confguard_github::{base64_encode, PutFileResult, RepoContext, Result};
use confguard_types::{GuardList, ROLLBACK_COMMIT_MESSAGE};
use tracing::{error, info};

/// Outcome of restoring one file.
#[derive(Debug)]
pub struct RollbackResult {
    /// Path that was restored.
    pub path: String,
    /// The new commit, or the error that stopped the restore.
    pub outcome: Result<PutFileResult>,
}

impl RollbackResult {
    /// Check if the file was restored.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// URL of the rollback commit, if the restore succeeded.
    pub fn commit_url(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|r| r.commit_url.as_str())
    }
}

/// Restore a single file to the blob it had before the push.
///
/// Reads the current blob SHA at `after_ref` immediately before writing, so
/// the write is based on the latest known state.
pub async fn restore_file(
    ctx: &RepoContext,
    after_ref: &str,
    file: &GuardedFile,
) -> Result<PutFileResult> {
    let current = ctx
        .service
        .get_file_content(&ctx.owner, &ctx.repo, &file.path, after_ref)
        .await?;

    let prior = ctx
        .service
        .get_blob(&ctx.owner, &ctx.repo, &file.blob_sha)
        .await?;
    let content = base64_encode(&prior.decode()?);

    ctx.service
        .put_file_content(
            &ctx.owner,
            &ctx.repo,
            &file.path,
            &content,
            &current.sha,
            ROLLBACK_COMMIT_MESSAGE,
        )
        .await
}

/// Restore each file in order.
///
/// A failure on one file is logged and recorded; the remaining files are
/// still attempted.
pub async fn execute_rollback(
    ctx: &RepoContext,
    after_ref: &str,
    files: &[GuardedFile],
) -> Vec<RollbackResult> {
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let outcome = restore_file(ctx, after_ref, file).await;

        match &outcome {
            Ok(updated) => {
                info!(
                    path = %file.path,
                    commit = %updated.commit_url,
                    "Repository updated successfully"
                );
            }
            Err(e) => {
                error!(path = %file.path, error = %e, "Failed to update repository");
            }
        }

        results.push(RollbackResult {
            path: file.path.clone(),
            outcome,
        });
    }

    results
}

/// Roll back every guarded file changed between `before_ref` and `after_ref`.
pub async fn rollback(
    ctx: &RepoContext,
    before_ref: &str,
    after_ref: &str,
    guard: &GuardList,
) -> Vec<RollbackResult> {
    let files = locate_guarded_files(ctx, before_ref, guard).await;

    if files.is_empty() {
        error!("No files to rollback");
        return Vec::new();
    }

    info!(files = files.len(), "Rolling back changes");
    execute_rollback(ctx, after_ref, &files).await
}
