//! The push authorization gate.
//!
//! A push that touches a guarded file needs both parties of the push to be
//! privileged: the sender (who triggered the event) and the pusher (who
//! transmitted the commits). Either one lacking privilege makes the push
//! unauthorized.

use crate::resolver::{resolve_privilege, Privilege};
use confguard_github::RepoContext;
use confguard_types::{AuthorizationPolicy, GuardList, Identity, PushEvent};
use tracing::{error, info};

/// Outcome of running a push through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The event lacks a sender or a pusher.
    Malformed,
    /// The commits changed no files.
    NoChanges,
    /// No files are configured as guarded.
    NothingGuarded,
    /// None of the changed files is guarded.
    Untouched,
    /// Both parties are privileged.
    Authorized {
        /// Privilege of the sender.
        sender: Privilege,
        /// Privilege of the pusher.
        pusher: Privilege,
    },
    /// At least one party is not privileged.
    Unauthorized {
        /// Privilege of the sender.
        sender: Privilege,
        /// Privilege of the pusher.
        pusher: Privilege,
    },
}

impl Authorization {
    /// Check if the push requires a rollback.
    pub fn requires_rollback(&self) -> bool {
        matches!(self, Authorization::Unauthorized { .. })
    }

    /// Identities that failed the check.
    pub fn unauthorized_identities(&self) -> Vec<Identity> {
        match self {
            Authorization::Unauthorized { sender, pusher } => [pusher, sender]
                .into_iter()
                .filter(|p| !p.authorized)
                .map(|p| p.identity.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Decide whether a push to guarded files is authorized.
pub async fn authorize(
    ctx: &RepoContext,
    event: &PushEvent,
    guard: &GuardList,
    policy: &AuthorizationPolicy,
) -> Authorization {
    let (Some(sender), Some(pusher)) = (event.sender(), event.pusher()) else {
        error!("Sender or pusher is missing");
        return Authorization::Malformed;
    };

    let changes = event.changed_files();
    info!("Files changed in the commits: {}", changes.join(", "));

    if changes.is_empty() {
        info!("No changes found in the commits");
        return Authorization::NoChanges;
    }

    if guard.is_empty() {
        info!("No files to guard");
        return Authorization::NothingGuarded;
    }

    if !guard.intersects(&changes) {
        info!("No changes found in the files that need to be guarded");
        return Authorization::Untouched;
    }

    // Both parties are always resolved so the logs name every failing identity.
    let pusher = resolve_privilege(ctx, &pusher, policy).await;
    let sender = resolve_privilege(ctx, &sender, policy).await;

    if !pusher.authorized {
        error!(
            pusher = %pusher.identity,
            permission = %pusher.permission,
            org_role = %pusher.org_role,
            "Pusher is not authorized to modify guarded files"
        );
    }

    if !sender.authorized {
        error!(
            sender = %sender.identity,
            permission = %sender.permission,
            org_role = %sender.org_role,
            "Sender is not authorized to modify guarded files"
        );
    }

    if pusher.authorized && sender.authorized {
        info!("User {} is authorized to make changes", sender.identity);
        Authorization::Authorized { sender, pusher }
    } else {
        Authorization::Unauthorized { sender, pusher }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confguard_github::testing::LogCapture;
    use confguard_github::InMemoryRepository;
    use serde_json::json;
    use std::sync::Arc;
    use tracing::Level;

    const CONFIG_PATH: &str = ".github/.ubiquibot-config.yml";

    fn policy() -> AuthorizationPolicy {
        AuthorizationPolicy::new(["admin", "billing_manager"])
    }

    fn guard() -> GuardList {
        GuardList::new([CONFIG_PATH])
    }

    fn setup() -> (Arc<InMemoryRepository>, RepoContext) {
        let service = Arc::new(InMemoryRepository::new("ubiquity", "test-repo").with_organization("ubiquity"));
        service.set_permission("ubiquity", "admin");
        service.set_org_role("ubiquity", "admin");
        service.set_permission("user2", "read");
        service.set_org_role("user2", "member");
        service.set_permission("billing", "read");
        service.set_org_role("billing", "billing_manager");
        let ctx = RepoContext::new("ubiquity", "test-repo", service.clone()).with_organization("ubiquity");
        (service, ctx)
    }

    fn push(sender: &str, pusher: &str, modified: &[&str]) -> PushEvent {
        serde_json::from_value(json!({
            "before": "sha-before",
            "after": "sha-after",
            "sender": { "login": sender },
            "pusher": { "name": pusher },
            "repository": { "name": "test-repo", "owner": { "login": "ubiquity" } },
            "organization": { "login": "ubiquity" },
            "commits": [{ "id": "sha-after", "added": [], "modified": modified }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_admin_push_is_authorized() {
        let (_service, ctx) = setup();
        let event = push("ubiquity", "ubiquity", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(matches!(result, Authorization::Authorized { .. }));
        assert!(!result.requires_rollback());
    }

    #[tokio::test]
    async fn test_admin_and_billing_manager_is_authorized() {
        let (_service, ctx) = setup();
        let event = push("ubiquity", "billing", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(matches!(result, Authorization::Authorized { .. }));
    }

    #[tokio::test]
    async fn test_unprivileged_sender_requires_rollback() {
        let (_service, ctx) = setup();
        let event = push("user2", "ubiquity", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(result.requires_rollback());
        assert_eq!(result.unauthorized_identities(), vec![Identity::new("user2")]);
    }

    #[tokio::test]
    async fn test_unprivileged_pusher_requires_rollback() {
        let (_service, ctx) = setup();
        let event = push("billing", "user2", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(result.requires_rollback());
        assert_eq!(result.unauthorized_identities(), vec![Identity::new("user2")]);
    }

    #[tokio::test]
    async fn test_both_resolved_even_after_first_failure() {
        let (service, ctx) = setup();
        let event = push("user2", "user2", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(result.requires_rollback());
        // Two identities, two signals each, no caching.
        assert_eq!(service.privilege_lookups(), 4);
        assert_eq!(result.unauthorized_identities().len(), 2);
    }

    #[tokio::test]
    async fn test_unguarded_push_skips_resolution() {
        let (service, ctx) = setup();
        let event = push("user2", "user2", &["README.md"]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert_eq!(result, Authorization::Untouched);
        assert_eq!(service.privilege_lookups(), 0);
    }

    #[tokio::test]
    async fn test_empty_guard_list_short_circuits() {
        let (service, ctx) = setup();
        let event = push("user2", "user2", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &GuardList::default(), &policy()).await;
        assert_eq!(result, Authorization::NothingGuarded);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_commits_short_circuits() {
        let (service, ctx) = setup();
        let mut event = push("user2", "user2", &[]);
        event.commits.clear();

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert_eq!(result, Authorization::NoChanges);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_pusher_is_malformed() {
        let (service, ctx) = setup();
        let mut event = push("ubiquity", "ubiquity", &[CONFIG_PATH]);
        event.pusher = None;

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert_eq!(result, Authorization::Malformed);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_added_guarded_file_is_detected() {
        let (_service, ctx) = setup();
        let mut event = push("user2", "user2", &[]);
        event.commits[0].added.push(CONFIG_PATH.to_string());

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(result.requires_rollback());
    }

    #[tokio::test]
    async fn test_authorized_push_logs_changes_and_verdict() {
        let (logs, _guard) = LogCapture::install();
        let (_service, ctx) = setup();
        let event = push("ubiquity", "ubiquity", &[CONFIG_PATH]);

        authorize(&ctx, &event, &guard(), &policy()).await;

        let changed = logs.matching(Level::INFO, "Files changed in the commits");
        assert_eq!(changed.len(), 1);
        assert!(changed[0].contains(CONFIG_PATH));
        assert_eq!(
            logs.count(Level::INFO, "User ubiquity is authorized to make changes"),
            1
        );
        assert_eq!(logs.count(Level::ERROR, "not authorized"), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_push_logs_one_error_per_identity() {
        let (logs, _guard) = LogCapture::install();
        let (_service, ctx) = setup();
        let event = push("user2", "user2", &[CONFIG_PATH]);

        authorize(&ctx, &event, &guard(), &policy()).await;

        let pusher = logs.matching(
            Level::ERROR,
            "Pusher is not authorized to modify guarded files",
        );
        assert_eq!(pusher.len(), 1);
        assert!(pusher[0].contains("pusher=user2"));
        let sender = logs.matching(
            Level::ERROR,
            "Sender is not authorized to modify guarded files",
        );
        assert_eq!(sender.len(), 1);
        assert!(sender[0].contains("sender=user2"));
        assert_eq!(logs.count(Level::INFO, "is authorized to make changes"), 0);
    }

    #[tokio::test]
    async fn test_lookup_failures_log_at_debug() {
        let (logs, _guard) = LogCapture::install();
        let (service, ctx) = setup();
        service.fail_lookups();
        let event = push("ubiquity", "ubiquity", &[CONFIG_PATH]);

        let result = authorize(&ctx, &event, &guard(), &policy()).await;
        assert!(result.requires_rollback());

        assert_eq!(logs.count(Level::DEBUG, "Collaborator permission lookup failed"), 2);
        assert_eq!(logs.count(Level::DEBUG, "Organization membership lookup failed"), 2);
        assert_eq!(logs.count(Level::ERROR, "not authorized"), 2);
    }
}
