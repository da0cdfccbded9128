//! Assembly of the release record from fetched commits.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::{info, warn};

use crate::error::TrackerError;
use crate::git::Commit;
use crate::release::{CommitSummary, IssueSummary, ReleaseSpec};
use crate::release::spec::IssueLabel;
use crate::tracker::{IssueTracker, TrackerKind};
use crate::users::UserResolver;

static GIT_ISSUE_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\B#\d+\b").unwrap());
static JIRA_ISSUE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Z0-9_]+-\d+\b").unwrap());

/// Commit admission rules for the release record.
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Record merge commits too, not just single-parent ones.
    pub include_merge_commits: bool,
    /// Scan merge commits for issue links even when they are not recorded,
    /// so pull-request bodies referenced by merges can still contribute.
    pub include_pr_changelog: bool,
    /// Commits whose message matches are left out entirely.
    pub exclude: Option<Regex>,
}

/// Builds up a [`ReleaseSpec`] commit by commit, enriching each with
/// tracker-resolved users and issues.
pub struct ReleaseBuilder<'a> {
    tracker: &'a dyn IssueTracker,
    kind: TrackerKind,
    users: UserResolver<'a>,
    /// Lookup memo: key -> whether the tracker knows it. Failed lookups are
    /// remembered so each key hits the tracker once per run.
    seen_issues: HashMap<String, bool>,
    logged_kind: bool,
    options: BuildOptions,
}

impl<'a> ReleaseBuilder<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, kind: TrackerKind, options: BuildOptions) -> Self {
        Self {
            tracker,
            kind,
            users: UserResolver::new(tracker),
            seen_issues: HashMap::new(),
            logged_kind: false,
            options,
        }
    }

    /// Record one commit on the release, resolving its author, committer and
    /// referenced issues. Resolution failures degrade to warnings; the
    /// commit itself is still recorded.
    pub async fn add_commit(&mut self, spec: &mut ReleaseSpec, commit: &Commit) {
        let record_merges = self.options.include_merge_commits;
        if commit.is_merge() && !record_merges && !self.options.include_pr_changelog {
            return;
        }
        if let Some(exclude) = &self.options.exclude {
            if exclude.is_match(&commit.message) {
                return;
            }
        }

        let author = match self.users.resolve_signature(&commit.author).await {
            Ok(author) => author,
            Err(e) => {
                warn!(sha = %commit.hash, "failed to resolve commit author: {e}");
                None
            }
        };
        let committer = match self.users.resolve_signature(&commit.committer).await {
            Ok(committer) => committer,
            Err(e) => {
                warn!(sha = %commit.hash, "failed to resolve commit committer: {e}");
                None
            }
        };

        let mut summary = CommitSummary {
            message: commit.message.clone(),
            sha: commit.hash.clone(),
            branch: "master".to_string(),
            author,
            committer,
            issue_ids: Vec::new(),
        };

        self.link_issues(spec, &mut summary, &commit.message).await;

        if !commit.is_merge() || record_merges {
            spec.commits.push(summary);
        }
    }

    /// Scan a commit message for issue keys and attach every resolvable one.
    async fn link_issues(&mut self, spec: &mut ReleaseSpec, summary: &mut CommitSummary, message: &str) {
        if !self.logged_kind {
            self.logged_kind = true;
            info!("finding issues in commit messages using {} format", self.kind);
        }
        if self.kind == TrackerKind::Jira {
            self.link_issues_matching(spec, summary, message, &JIRA_ISSUE_KEY)
                .await;
        }
        self.link_issues_matching(spec, summary, message, &GIT_ISSUE_KEY)
            .await;
    }

    async fn link_issues_matching(
        &mut self,
        spec: &mut ReleaseSpec,
        summary: &mut CommitSummary,
        message: &str,
        pattern: &Regex,
    ) {
        for found in pattern.find_iter(message) {
            let key = found.as_str().trim_start_matches('#').to_string();
            match self.seen_issues.get(&key) {
                Some(true) => {
                    if !summary.issue_ids.contains(&key) {
                        summary.issue_ids.push(key);
                    }
                }
                Some(false) => {}
                None => {
                    self.seen_issues.insert(key.clone(), false);
                    match self.fetch_issue(&key).await {
                        Ok(Some(issue)) => {
                            self.seen_issues.insert(key.clone(), true);
                            summary.issue_ids.push(key);
                            if issue.is_pull_request {
                                spec.pull_requests.push(issue);
                            } else {
                                spec.issues.push(issue);
                            }
                        }
                        Ok(None) => {
                            warn!(
                                "failed to find issue {key} for repository {}",
                                self.tracker.home_url()
                            );
                        }
                        Err(e) => {
                            warn!(
                                "failed to look up issue {key} in issue tracker {}: {e}",
                                self.tracker.home_url()
                            );
                        }
                    }
                }
            }
        }
    }

    /// Fetch one issue and resolve its users into an [`IssueSummary`].
    async fn fetch_issue(&mut self, key: &str) -> Result<Option<IssueSummary>, TrackerError> {
        let Some(issue) = self.tracker.get_issue(key).await? else {
            return Ok(None);
        };

        // Git trackers report bare logins; complete them through the
        // resolver. Other kinds already return full profiles.
        let user = match &issue.author {
            Some(author) if self.kind == TrackerKind::Git => {
                match self.users.resolve(author).await {
                    Ok(user) => user,
                    Err(e) => {
                        warn!("failed to resolve user for issue {key}: {e}");
                        Some(author.clone())
                    }
                }
            }
            Some(author) => Some(author.clone()),
            None => None,
        };

        let assignees = match self.users.resolve_all(&issue.assignees).await {
            Ok(assignees) => assignees,
            Err(e) => {
                warn!("failed to resolve assignees for issue {key}: {e}");
                issue.assignees.clone()
            }
        };

        Ok(Some(IssueSummary {
            id: key.to_string(),
            url: issue.url,
            title: issue.title,
            body: issue.body,
            user,
            creation_timestamp: issue.created_at,
            assignees,
            labels: issue
                .labels
                .into_iter()
                .map(|name| IssueLabel { name })
                .collect(),
            state: issue.state,
            is_pull_request: issue.is_pull_request,
        }))
    }
}
