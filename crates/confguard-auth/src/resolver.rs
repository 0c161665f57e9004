//! Privilege resolution.
//!
//! A user's privilege is read from two independent signals: the collaborator
//! permission on the repository and the membership role in the organization.
//! Either signal failing to resolve counts as [`Role::none`]; a lookup error
//! never grants privilege and never aborts the check.

use confguard_github::{GitHubError, RepoContext};
use confguard_types::{AuthorizationPolicy, Identity, Role};
use tracing::debug;

/// Both privilege signals for one identity, and the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privilege {
    /// The identity that was resolved.
    pub identity: Identity,
    /// Collaborator permission on the repository.
    pub permission: Role,
    /// Membership role in the organization.
    pub org_role: Role,
    /// Whether at least one signal is in the allow-list.
    pub authorized: bool,
}

impl Privilege {
    /// Apply `policy` to a pair of signals.
    pub fn evaluate(
        identity: Identity,
        permission: Role,
        org_role: Role,
        policy: &AuthorizationPolicy,
    ) -> Self {
        let authorized = policy.allows(&permission) || policy.allows(&org_role);
        Self {
            identity,
            permission,
            org_role,
            authorized,
        }
    }
}

/// Collaborator permission of `identity`, or `"none"` if it cannot be read.
pub async fn collaborator_permission(ctx: &RepoContext, identity: &Identity) -> Role {
    match ctx
        .service
        .get_collaborator_permission(&ctx.owner, &ctx.repo, identity.username())
        .await
    {
        Ok(role) => role,
        Err(error) => {
            debug!(user = %identity, error = %error, "Collaborator permission lookup failed");
            Role::none()
        }
    }
}

/// Organization role of `identity`, or `"none"` if it cannot be read.
pub async fn organization_role(ctx: &RepoContext, identity: &Identity) -> Role {
    let result = match ctx.organization.as_deref() {
        Some(org) => {
            ctx.service
                .get_org_membership(org, identity.username())
                .await
        }
        None => Err(GitHubError::MissingOrganization),
    };

    match result {
        Ok(role) => role,
        Err(error) => {
            debug!(user = %identity, error = %error, "Organization membership lookup failed");
            Role::none()
        }
    }
}

/// Resolve both signals for `identity` and apply `policy`.
///
/// Nothing is cached; each call performs both lookups.
pub async fn resolve_privilege(
    ctx: &RepoContext,
    identity: &Identity,
    policy: &AuthorizationPolicy,
) -> Privilege {
    let permission = collaborator_permission(ctx, identity).await;
    let org_role = organization_role(ctx, identity).await;

    Privilege::evaluate(identity.clone(), permission, org_role, policy)
}

/// Check whether `identity` holds a role in `policy`.
pub async fn is_authorized(
    ctx: &RepoContext,
    identity: &Identity,
    policy: &AuthorizationPolicy,
) -> bool {
    resolve_privilege(ctx, identity, policy).await.authorized
}

#[cfg(test)]
mod tests {
    use super::*;
    use confguard_github::{Call, InMemoryRepository};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn policy() -> AuthorizationPolicy {
        AuthorizationPolicy::new(["admin", "billing_manager"])
    }

    fn setup() -> (Arc<InMemoryRepository>, RepoContext) {
        let service = Arc::new(InMemoryRepository::new("acme", "config").with_organization("acme"));
        let ctx = RepoContext::new("acme", "config", service.clone()).with_organization("acme");
        (service, ctx)
    }

    #[tokio::test]
    async fn test_collaborator_admin_is_authorized() {
        let (service, ctx) = setup();
        service.set_permission("alice", "admin");
        service.set_org_role("alice", "member");

        let privilege = resolve_privilege(&ctx, &Identity::new("alice"), &policy()).await;
        assert!(privilege.authorized);
        assert_eq!(privilege.permission, Role::new("admin"));
        assert_eq!(privilege.org_role, Role::new("member"));
    }

    #[tokio::test]
    async fn test_billing_manager_is_authorized() {
        let (service, ctx) = setup();
        service.set_permission("bea", "read");
        service.set_org_role("bea", "billing_manager");

        assert!(is_authorized(&ctx, &Identity::new("bea"), &policy()).await);
    }

    #[tokio::test]
    async fn test_write_is_not_admin() {
        let (service, ctx) = setup();
        service.set_permission("wes", "write");
        service.set_org_role("wes", "member");

        assert!(!is_authorized(&ctx, &Identity::new("wes"), &policy()).await);
    }

    #[tokio::test]
    async fn test_unknown_user_resolves_to_none() {
        let (_service, ctx) = setup();

        let privilege = resolve_privilege(&ctx, &Identity::new("ghost"), &policy()).await;
        assert!(!privilege.authorized);
        assert!(privilege.permission.is_none());
        assert!(privilege.org_role.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_closed() {
        let (service, ctx) = setup();
        service.set_permission("alice", "admin");
        service.fail_lookups();

        let privilege = resolve_privilege(&ctx, &Identity::new("alice"), &policy()).await;
        assert!(!privilege.authorized);
        assert!(privilege.permission.is_none());
    }

    #[tokio::test]
    async fn test_policy_containing_none_matches_failures() {
        // A lookup failure is indistinguishable from the role "none".
        let (_service, ctx) = setup();
        let policy = AuthorizationPolicy::new(["none"]);

        assert!(is_authorized(&ctx, &Identity::new("ghost"), &policy).await);
    }

    #[tokio::test]
    async fn test_missing_organization_degrades_to_none() {
        let service = Arc::new(InMemoryRepository::new("alice", "dotfiles"));
        service.set_permission("alice", "admin");
        let ctx = RepoContext::new("alice", "dotfiles", service.clone());

        let privilege = resolve_privilege(&ctx, &Identity::new("alice"), &policy()).await;
        assert!(privilege.authorized);
        assert!(privilege.org_role.is_none());
        assert_eq!(
            service.calls(),
            vec![Call::CollaboratorPermission("alice".into())]
        );
    }

    #[tokio::test]
    async fn test_no_caching_between_calls() {
        let (service, ctx) = setup();
        let alice = Identity::new("alice");

        resolve_privilege(&ctx, &alice, &policy()).await;
        resolve_privilege(&ctx, &alice, &policy()).await;

        assert_eq!(service.privilege_lookups(), 4);
    }

    fn role_strategy() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("admin")),
            Just(Some("write")),
            Just(Some("read")),
            Just(Some("member")),
            Just(Some("billing_manager")),
        ]
    }

    proptest! {
        /// Property: the verdict is the OR of the two signals against the
        /// allow-list, with a missing signal counting as "none".
        #[test]
        fn prop_signals_are_ored(
            permission in role_strategy(),
            org_role in role_strategy(),
            fail in any::<bool>(),
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let (service, ctx) = setup();
            if let Some(p) = permission {
                service.set_permission("user", p);
            }
            if let Some(r) = org_role {
                service.set_org_role("user", r);
            }
            if fail {
                service.fail_lookups();
            }

            let policy = policy();
            let verdict = runtime.block_on(is_authorized(&ctx, &Identity::new("user"), &policy));

            let allowed = |role: Option<&str>| {
                !fail && role.map(|r| policy.allows(&Role::new(r))).unwrap_or(false)
            };
            prop_assert_eq!(verdict, allowed(permission) || allowed(org_role));
        }
    }
}
