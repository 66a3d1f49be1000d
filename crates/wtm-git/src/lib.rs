//! Git collaborator for the worktree manager
//!
//! Everything that touches git lives behind [`VcsBackend`]; the pure
//! naming rules ([`sanitize`], [`naming`]) sit next to it because both
//! sides of the worktree lifecycle depend on them.

pub mod backend;
pub mod error;
pub mod git2_backend;
mod helpers;
pub mod naming;
pub mod sanitize;

pub use backend::{BranchKind, BranchRef, VcsBackend, WorktreeEntry, WorktreeSource};
pub use error::{Error, Result};
pub use git2_backend::Git2Backend;
pub use naming::{DEFAULT_SUFFIX, WorktreeNaming};
pub use sanitize::{SanitizedBranch, sanitize};
