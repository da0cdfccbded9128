//! The structured release record.
//!
//! Serialized with camelCase field names so the YAML/JSON envelope matches
//! what downstream release tooling consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything known about one release: the classified commit range plus the
/// issues, pull requests and dependency updates resolved for it.
///
/// The orchestrator owns and mutates this during a single run; the renderer
/// only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub git_owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub git_repository: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub git_http_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_notes_url: String,
    #[serde(default)]
    pub commits: Vec<CommitSummary>,
    #[serde(default)]
    pub issues: Vec<IssueSummary>,
    #[serde(default)]
    pub pull_requests: Vec<IssueSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_updates: Vec<DependencyUpdate>,
}

/// One commit as recorded in the release record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub message: String,
    pub sha: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue_ids: Vec<String>,
}

/// An issue or pull request referenced by the release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<UserDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<IssueLabel>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pull_request: bool,
}

/// A label attached to an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLabel {
    pub name: String,
}

/// A tracker or git identity, as complete as resolution managed to make it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub avatar_url: String,
}

impl UserDetails {
    /// Fill empty fields from `other`, keeping existing values.
    pub fn merge_from(&mut self, other: &UserDetails) {
        if self.login.is_empty() {
            self.login = other.login.clone();
        }
        if self.name.is_empty() {
            self.name = other.name.clone();
        }
        if self.email.is_empty() {
            self.email = other.email.clone();
        }
        if self.url.is_empty() {
            self.url = other.url.clone();
        }
        if self.avatar_url.is_empty() {
            self.avatar_url = other.avatar_url.clone();
        }
    }
}

/// One dependency version change between two releases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyUpdate {
    pub component: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to_version: String,
}
