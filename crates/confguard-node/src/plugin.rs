//! Event dispatch: how the worker runs the guard for one event.

use crate::error::NodeError;
use confguard_auth::{authorize, Authorization};
use confguard_github::{GitHubClient, RepoContext};
use confguard_rollback::{rollback, RollbackResult};
use confguard_types::{AuthorizationPolicy, GuardList, PluginSettings, PushEvent, PUSH_EVENT};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, Instrument};

/// Inputs delivered to the worker for one event.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInputs {
    /// Identifier of the dispatch that produced this event.
    #[serde(default)]
    pub state_id: String,
    /// Event name (e.g., "push").
    pub event_name: String,
    /// Raw webhook payload.
    pub event_payload: serde_json::Value,
    /// Raw plugin settings.
    #[serde(default)]
    pub settings: serde_json::Value,
    /// Token used to call the repository service.
    #[serde(default)]
    pub auth_token: String,
    /// Ref the plugin was invoked from.
    #[serde(default, rename = "ref")]
    pub git_ref: String,
}

/// A file restored by a rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoredFile {
    /// Path restored.
    pub path: String,
    /// URL of the rollback commit.
    pub commit_url: String,
}

/// A file that could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    /// Path that failed.
    pub path: String,
    /// Error message.
    pub error: String,
}

/// What the worker did with an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The event is not a push.
    Ignored {
        /// Name of the ignored event.
        event: String,
    },
    /// The push lacks a sender or pusher.
    Malformed,
    /// The push changed no files.
    NoChanges,
    /// No files are guarded.
    NothingGuarded,
    /// No guarded file was changed.
    Untouched,
    /// Both parties are privileged; nothing was rolled back.
    Authorized {
        /// Sender of the push.
        sender: String,
    },
    /// The push was unauthorized and guarded files were rolled back.
    RolledBack {
        /// Files restored.
        restored: Vec<RestoredFile>,
        /// Files that could not be restored.
        failed: Vec<FailedFile>,
    },
}

impl Outcome {
    fn rolled_back(results: Vec<RollbackResult>) -> Self {
        let mut restored = Vec::new();
        let mut failed = Vec::new();

        for result in results {
            match result.outcome {
                Ok(put) => restored.push(RestoredFile {
                    path: result.path,
                    commit_url: put.commit_url,
                }),
                Err(e) => failed.push(FailedFile {
                    path: result.path,
                    error: e.to_string(),
                }),
            }
        }

        Outcome::RolledBack { restored, failed }
    }
}

/// Run the guard for a push event.
///
/// Authorizes the push and, when unauthorized, rolls guarded files back to
/// their pre-push content. Never fails; every problem is logged and folded
/// into the outcome.
pub async fn handle_push(ctx: &RepoContext, event: &PushEvent, settings: &PluginSettings) -> Outcome {
    let guard = GuardList::from(settings);
    let policy = AuthorizationPolicy::from(settings);

    match authorize(ctx, event, &guard, &policy).await {
        Authorization::Malformed => Outcome::Malformed,
        Authorization::NoChanges => Outcome::NoChanges,
        Authorization::NothingGuarded => Outcome::NothingGuarded,
        Authorization::Untouched => Outcome::Untouched,
        Authorization::Authorized { sender, .. } => Outcome::Authorized {
            sender: sender.identity.to_string(),
        },
        Authorization::Unauthorized { .. } => {
            let results = rollback(ctx, &event.before, &event.after, &guard).await;
            Outcome::rolled_back(results)
        }
    }
}

/// Build the request context for a push.
pub fn repo_context(
    event: &PushEvent,
    service: Arc<dyn confguard_github::RemoteRepository>,
) -> Result<RepoContext, NodeError> {
    let owner = event
        .repository
        .owner_login()
        .ok_or_else(|| NodeError::InvalidPayload("repository owner is missing".into()))?;

    let ctx = RepoContext::new(owner, event.repository.name.clone(), service);
    Ok(match event.organization_login() {
        Some(org) => ctx.with_organization(org),
        None => ctx,
    })
}

/// Parse and validate plugin settings.
pub fn parse_settings(raw: &serde_json::Value) -> Result<PluginSettings, NodeError> {
    let settings: PluginSettings = serde_json::from_value(raw.clone())
        .map_err(|e| NodeError::InvalidSettings(e.to_string()))?;

    settings
        .validated()
        .map_err(|e| NodeError::InvalidSettings(e.to_string()))
}

/// Run the plugin for one set of inputs.
pub async fn run_plugin(
    inputs: PluginInputs,
    api_url: &str,
    timeout: Duration,
) -> Result<Outcome, NodeError> {
    let span = info_span!(
        "plugin",
        state_id = %inputs.state_id,
        event = %inputs.event_name,
        git_ref = %inputs.git_ref
    );

    async move {
        if inputs.event_name != PUSH_EVENT {
            info!("Ignoring unsupported event");
            return Ok(Outcome::Ignored {
                event: inputs.event_name,
            });
        }

        let settings = parse_settings(&inputs.settings)?;
        let event: PushEvent = serde_json::from_value(inputs.event_payload)
            .map_err(|e| NodeError::InvalidPayload(e.to_string()))?;

        let token = Some(inputs.auth_token).filter(|t| !t.is_empty());
        let client = GitHubClient::with_timeout(api_url, token, timeout)?;
        let ctx = repo_context(&event, Arc::new(client))?;

        Ok(handle_push(&ctx, &event, &settings).await)
    }
    .instrument(span)
    .await
}
