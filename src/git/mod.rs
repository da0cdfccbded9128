//! Git operations using git2-rs.

pub mod commits;
pub mod range;
pub mod remote;
pub mod tags;

pub use commits::{Commit, Signature};
pub use range::{fetch_commits, open_repository, resolve_ref};
pub use remote::RepoInfo;
pub use tags::{TagInfo, first_commit, latest_tag, revision_before, tags_by_creation_desc, version_from_tag};
