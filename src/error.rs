//! Error types for herald modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("check {path:?} is an existing git repository path")]
    RepositoryPath {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("reference {reference:?} can't be found in git repository")]
    ReferenceNotFound { reference: String },

    #[error(
        "can't produce a diff between {from} and {to}, check your range is correct by running \"git log {from}..{to}\""
    )]
    NoDiffBetweenReferences { from: String, to: String },

    #[error("an issue occurred during tree analysis: {0}")]
    TreeBrowsing(#[source] git2::Error),

    #[error("failed to list tags: {0}")]
    ListTags(#[source] git2::Error),

    #[error("no commit found before date '{0}'")]
    NoCommitBeforeDate(String),
}

/// Errors from issue tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("failed to convert issue key '{0}' to a number")]
    InvalidIssueKey(String),

    #[error("failed to build tracker client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("failed to look up issue {key}: {source}")]
    IssueLookup {
        key: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("failed to look up user {login}: {source}")]
    UserLookup {
        login: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("failed to publish release for tag {tag}: {source}")]
    ReleaseLookup {
        tag: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("could not parse remote url '{0}' into host, owner and repository")]
    InvalidRemoteUrl(String),
}

/// Errors from dependency status report handling.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to read dependency status blob {spec}: {source}")]
    PreviousStatus {
        spec: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to read dependency status file {path}: {source}")]
    ReadStatus {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dependency status for {rev}: {source}")]
    ParseStatus {
        rev: String,
        #[source]
        source: serde_yaml::Error,
    },
}
