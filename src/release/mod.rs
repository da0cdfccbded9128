//! The release record and its assembly.

pub mod builder;
pub mod deps;
pub mod spec;

pub use builder::{BuildOptions, ReleaseBuilder};
pub use deps::dependency_updates;
pub use spec::{CommitSummary, DependencyUpdate, IssueLabel, IssueSummary, ReleaseSpec, UserDetails};
