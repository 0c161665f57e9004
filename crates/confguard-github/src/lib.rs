//! Repository service access for `confguard`.
//!
//! This crate provides:
//! - **[`RemoteRepository`]**: the operations the guard needs from the
//!   hosting service (permission and membership lookups, commit and content
//!   reads, content writes)
//! - **[`GitHubClient`]**: an implementation backed by the GitHub REST API
//! - **[`InMemoryRepository`]**: an implementation backed by plain maps that
//!   records every call
//! - **[`RepoContext`]**: the per-event bundle of repository coordinates and
//!   service handle passed into every guard component
//!
//! # Example
//!
//! ```
//! use confguard_github::{InMemoryRepository, RepoContext};
//! use std::sync::Arc;
//!
//! let service = Arc::new(InMemoryRepository::new("acme", "config").with_organization("acme"));
//! service.set_permission("alice", "admin");
//!
//! let ctx = RepoContext::new("acme", "config", service).with_organization("acme");
//! assert_eq!(ctx.repo_key(), "acme/config");
//! ```

mod client;
mod context;
mod error;
mod memory;
mod service;
mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{GitHubClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use context::RepoContext;
pub use error::{GitHubError, Result};
pub use memory::{Call, InMemoryRepository, RecordedWrite};
pub use service::RemoteRepository;
pub use types::{
    base64_decode, base64_encode, CommitFile, CommitInfo, FileContent, PutFileResult,
};
