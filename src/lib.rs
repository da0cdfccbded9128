//! herald - generates a release changelog and release record from a git
//! commit range.
//!
//! # Overview
//!
//! herald diffs two git revisions, classifies each commit against the
//! Conventional Commits grammar, cross-references issues and pull requests
//! from the tracker, and renders deterministic markdown plus a structured
//! release record suitable for YAML/JSON persistence.

pub mod changelog;
pub mod error;
pub mod git;
pub mod release;
pub mod tracker;
pub mod users;

// Re-export commonly used types
pub use changelog::{CommitGroup, CommitInfo, GroupRegistry, RenderOptions, parse_commit, render};
pub use error::{GitError, ReportError, TrackerError};
pub use git::{Commit, RepoInfo, fetch_commits, open_repository};
pub use release::{BuildOptions, ReleaseBuilder, ReleaseSpec};
pub use tracker::{Issue, IssueTracker, TrackerKind};
pub use users::UserResolver;
