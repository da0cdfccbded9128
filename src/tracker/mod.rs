//! Issue tracker boundary.
//!
//! The orchestrator enriches commits with issues and users through the
//! [`IssueTracker`] trait; the core never talks to the network itself.

pub mod github;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TrackerError;
use crate::release::UserDetails;

pub use github::{GitHubTracker, discover_token};

/// Which tracker family is configured.
///
/// The kind is decided once at configuration time and carried alongside the
/// provider handle; it selects the issue-key grammar scanned for in commit
/// messages (`#123` always, `ABC-123` additionally for Jira).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Git,
    Jira,
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Git => write!(f, "git"),
            Self::Jira => write!(f, "jira"),
        }
    }
}

/// An issue (or pull request) as the tracker reports it.
#[derive(Debug, Clone, Default)]
pub struct Issue {
    pub id: String,
    pub url: String,
    pub title: String,
    pub body: String,
    pub author: Option<UserDetails>,
    pub assignees: Vec<UserDetails>,
    pub labels: Vec<String>,
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub is_pull_request: bool,
}

/// Read access to an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch the issue with the given key, `None` when it does not exist.
    async fn get_issue(&self, key: &str) -> Result<Option<Issue>, TrackerError>;

    /// Look up a user profile by login, `None` when it does not exist.
    async fn find_user(&self, login: &str) -> Result<Option<UserDetails>, TrackerError>;

    /// Browse URL of the issue with the given key.
    fn issue_url(&self, key: &str) -> String;

    /// Home URL of the tracker itself.
    fn home_url(&self) -> String;
}
