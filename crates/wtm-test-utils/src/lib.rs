//! Shared test utilities for the worktree-manager workspace.
//!
//! Dev-dependency only. Fixtures drive the real `git` CLI so that the
//! libgit2 backend is tested against repositories git itself produced.
//!
//! # Modules
//!
//! - [`git`]: git CLI wrapper and clone builders with a bare `origin`
//! - [`workspace`]: [`TestWorkspace`], a root directory of clones

pub mod git;
pub mod workspace;

pub use workspace::TestWorkspace;
