//! Guarded-file rollback for `confguard`.
//!
//! When an unauthorized push changes a guarded file, the file is restored by
//! writing its pre-push content back as a new commit. History is never
//! rewritten.
//!
//! The pre-push state is read from the commit the branch pointed at before
//! the push: each guarded entry in that commit's file list names the blob to
//! restore.

mod executor;
mod locator;

pub use executor::{execute_rollback, restore_file, rollback, RollbackResult};
pub use locator::{locate_guarded_files, GuardedFile};
