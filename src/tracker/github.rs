//! GitHub-backed issue tracker using octocrab.

use std::env;
use std::process::Command;

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::{debug, warn};

use crate::error::TrackerError;
use crate::git::RepoInfo;
use crate::release::UserDetails;

use super::{Issue, IssueTracker};

pub struct GitHubTracker {
    client: Octocrab,
    repo: RepoInfo,
}

impl GitHubTracker {
    /// Build a tracker for the given repository. Without a token the client
    /// falls back to anonymous access, which is enough for public
    /// repositories but heavily rate limited.
    pub fn new(repo: RepoInfo, token: Option<String>) -> Result<Self, TrackerError> {
        let mut builder = Octocrab::builder();
        match token {
            Some(token) => builder = builder.personal_token(token),
            None => warn!("no git API token found, using anonymous tracker access"),
        }
        let client = builder
            .build()
            .map_err(|e| TrackerError::ClientBuild(Box::new(e)))?;
        Ok(Self { client, repo })
    }

    /// Publish the markdown as the release notes of `tag`, creating the
    /// release when none exists yet. Returns the release page URL.
    pub async fn publish_release(
        &self,
        tag: &str,
        title: &str,
        body: &str,
    ) -> Result<String, TrackerError> {
        let lookup_err = |e: octocrab::Error| TrackerError::ReleaseLookup {
            tag: tag.to_string(),
            source: Box::new(e),
        };

        let repos = self
            .client
            .repos(self.repo.owner.clone(), self.repo.name.clone());
        let releases = repos.releases();
        let existing = match releases.get_by_tag(tag).await {
            Ok(release) => Some(release),
            Err(e) if is_not_found(&e) => None,
            Err(e) => return Err(lookup_err(e)),
        };

        let release = match existing {
            Some(release) => {
                releases
                    .update(release.id.0)
                    .name(title)
                    .body(body)
                    .send()
                    .await
                    .map_err(lookup_err)?
            }
            None => {
                releases
                    .create(tag)
                    .name(title)
                    .body(body)
                    .send()
                    .await
                    .map_err(lookup_err)?
            }
        };
        Ok(release.html_url.to_string())
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn get_issue(&self, key: &str) -> Result<Option<Issue>, TrackerError> {
        let number: u64 = key
            .parse()
            .map_err(|_| TrackerError::InvalidIssueKey(key.to_string()))?;

        let issue = match self
            .client
            .issues(self.repo.owner.clone(), self.repo.name.clone())
            .get(number)
            .await
        {
            Ok(issue) => issue,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => {
                return Err(TrackerError::IssueLookup {
                    key: key.to_string(),
                    source: Box::new(e),
                });
            }
        };

        Ok(Some(Issue {
            id: issue.number.to_string(),
            url: issue.html_url.to_string(),
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            author: Some(author_details(&issue.user)),
            assignees: issue.assignees.iter().map(author_details).collect(),
            labels: issue.labels.into_iter().map(|label| label.name).collect(),
            state: match issue.state {
                octocrab::models::IssueState::Closed => "closed".to_string(),
                _ => "open".to_string(),
            },
            created_at: Some(issue.created_at),
            is_pull_request: issue.pull_request.is_some(),
        }))
    }

    async fn find_user(&self, login: &str) -> Result<Option<UserDetails>, TrackerError> {
        let profile = match self.client.users(login).profile().await {
            Ok(profile) => profile,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => {
                return Err(TrackerError::UserLookup {
                    login: login.to_string(),
                    source: Box::new(e),
                });
            }
        };
        Ok(Some(UserDetails {
            login: profile.login,
            name: profile.name.unwrap_or_default(),
            email: profile.email.unwrap_or_default(),
            url: profile.html_url.to_string(),
            avatar_url: profile.avatar_url.to_string(),
        }))
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/issues/{}", self.repo.https_url(), key)
    }

    fn home_url(&self) -> String {
        self.repo.https_url()
    }
}

fn author_details(author: &octocrab::models::Author) -> UserDetails {
    UserDetails {
        login: author.login.clone(),
        url: author.html_url.to_string(),
        avatar_url: author.avatar_url.to_string(),
        ..UserDetails::default()
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

/// Find a git API token.
///
/// Checks, in order: `GITHUB_TOKEN`, `GH_TOKEN` and `GIT_API_TOKEN`
/// environment variables, then the `gh` CLI.
pub fn discover_token() -> Option<String> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN", "GIT_API_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                debug!(source = var, "using git API token from environment");
                return Some(token);
            }
        }
    }
    token_from_gh_cli()
}

fn token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        debug!("using git API token from gh CLI");
        Some(token)
    }
}
