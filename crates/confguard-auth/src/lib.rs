//! Authorization for `confguard`.
//!
//! This crate provides:
//! - **Privilege resolution**: reduce a user's collaborator permission and
//!   organization role to a single verdict against an allow-list
//! - **Push authorization**: decide whether a push that touches guarded
//!   files was made by privileged parties
//!
//! # Example
//!
//! ```
//! use confguard_auth::{authorize, Authorization};
//! use confguard_github::{InMemoryRepository, RepoContext};
//! use confguard_types::{AuthorizationPolicy, GuardList, PushCommit, PushEvent, Pusher, User};
//! use std::sync::Arc;
//!
//! let service = Arc::new(InMemoryRepository::new("acme", "config").with_organization("acme"));
//! service.set_permission("alice", "admin");
//! let ctx = RepoContext::new("acme", "config", service).with_organization("acme");
//!
//! let event = PushEvent {
//!     sender: Some(User { login: "alice".into() }),
//!     pusher: Some(Pusher { name: "alice".into(), email: None }),
//!     commits: vec![PushCommit {
//!         modified: vec!["config.yml".into()],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let policy = AuthorizationPolicy::new(["admin"]);
//! let guard = GuardList::new(["config.yml"]);
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let result = runtime.block_on(authorize(&ctx, &event, &guard, &policy));
//! assert!(matches!(result, Authorization::Authorized { .. }));
//! ```

mod gate;
mod resolver;

pub use gate::{authorize, Authorization};
pub use resolver::{
    collaborator_permission, is_authorized, organization_role, resolve_privilege, Privilege,
};
