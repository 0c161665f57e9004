//! Common types used throughout `confguard`.
//!
//! This crate provides:
//! - **Identities**: usernames for the sender and pusher of a push
//! - **Roles**: privilege signals reported by the repository service
//! - **Push events**: the subset of a push webhook payload the guard reads
//! - **Settings**: the allow-list policy and the guarded file list
//!
//! # Example
//!
//! ```
//! use confguard_types::{AuthorizationPolicy, GuardList, PluginSettings, Role};
//!
//! let settings = PluginSettings {
//!     roles_allowed_to_modify: vec!["admin".into(), "billing_manager".into()],
//!     files_that_need_guarded: vec![".github/config.yml".into()],
//! };
//!
//! let policy = AuthorizationPolicy::from(&settings);
//! assert!(policy.allows(&Role::new("admin")));
//! assert!(!policy.allows(&Role::none()));
//!
//! let guard = GuardList::from(&settings);
//! assert!(guard.is_guarded(".github/config.yml"));
//! ```

mod error;
mod identity;
mod push;
mod role;
mod settings;

pub use error::{Result, TypesError};
pub use identity::Identity;
pub use push::{Organization, PushCommit, PushEvent, Pusher, Repository, RepositoryOwner, User};
pub use role::Role;
pub use settings::{AuthorizationPolicy, GuardList, PluginSettings};

/// Name of the only event kind the guard reacts to.
pub const PUSH_EVENT: &str = "push";

/// Commit message used for every protection rollback.
pub const ROLLBACK_COMMIT_MESSAGE: &str = "Config Protection Rollback";
