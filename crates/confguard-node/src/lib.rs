//! # Confguard Node
//!
//! HTTP worker that protects configuration files from unauthorized pushes.
//!
//! For every push event the worker checks whether a guarded file changed.
//! If so, both the sender and the pusher must hold a role from the
//! configured allow-list, as a repository collaborator or as an organization
//! member. When either does not, each guarded file is rolled back to its
//! pre-push content with a new commit.
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin confguard-node -- --listen-addr 127.0.0.1:8080
//! ```
//!
//! ## Modules
//!
//! - [`api`] - HTTP endpoints
//! - [`plugin`] - Event dispatch and the push handler
//! - [`config`] - Node configuration
//! - [`observability`] - Logging setup

pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod plugin;

pub use error::NodeError;
