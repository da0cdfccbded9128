//! Release builder behavior against a stub tracker.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use regex_lite::Regex;

use herald::error::TrackerError;
use herald::git::{Commit, Signature};
use herald::release::{BuildOptions, ReleaseBuilder, ReleaseSpec};
use herald::tracker::{Issue, IssueTracker, TrackerKind};

/// In-memory tracker recording every lookup it serves.
struct StubTracker {
    issues: HashMap<String, Issue>,
    lookups: Mutex<Vec<String>>,
}

impl StubTracker {
    fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues: issues.into_iter().map(|i| (i.id.clone(), i)).collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn lookup_count(&self, key: &str) -> usize {
        self.lookups
            .lock()
            .expect("lookup log poisoned")
            .iter()
            .filter(|k| *k == key)
            .count()
    }
}

#[async_trait]
impl IssueTracker for StubTracker {
    async fn get_issue(&self, key: &str) -> Result<Option<Issue>, TrackerError> {
        self.lookups
            .lock()
            .expect("lookup log poisoned")
            .push(key.to_string());
        Ok(self.issues.get(key).cloned())
    }

    async fn find_user(
        &self,
        _login: &str,
    ) -> Result<Option<herald::release::UserDetails>, TrackerError> {
        Ok(None)
    }

    fn issue_url(&self, key: &str) -> String {
        format!("https://tracker.example.com/issues/{key}")
    }

    fn home_url(&self) -> String {
        "https://tracker.example.com".to_string()
    }
}

fn issue(id: &str, is_pull_request: bool) -> Issue {
    Issue {
        id: id.to_string(),
        url: format!("https://tracker.example.com/issues/{id}"),
        title: format!("issue {id}"),
        is_pull_request,
        ..Issue::default()
    }
}

fn commit(message: &str, parents: usize) -> Commit {
    Commit {
        hash: format!("{:040}", message.len()),
        parent_hashes: (0..parents).map(|n| format!("{n:040}")).collect(),
        message: message.to_string(),
        author: Signature {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            ..Signature::default()
        },
        committer: Signature::default(),
    }
}

#[tokio::test]
async fn issues_and_pull_requests_are_routed_and_memoized() {
    let tracker = StubTracker::new(vec![issue("123", false), issue("345", true)]);
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, BuildOptions::default());
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("fix: one\nfixes #123", 1))
        .await;
    builder
        .add_commit(&mut spec, &commit("feat: two\ncloses #345 and #123 again", 1))
        .await;
    builder
        .add_commit(&mut spec, &commit("chore: three\nsee #999", 1))
        .await;

    assert_eq!(spec.commits.len(), 3);
    assert_eq!(spec.commits[0].issue_ids, vec!["123"]);
    assert_eq!(spec.commits[1].issue_ids, vec!["345", "123"]);
    assert!(spec.commits[2].issue_ids.is_empty());

    assert_eq!(spec.issues.len(), 1);
    assert_eq!(spec.issues[0].id, "123");
    assert_eq!(spec.pull_requests.len(), 1);
    assert_eq!(spec.pull_requests[0].id, "345");
    assert!(spec.pull_requests[0].is_pull_request);

    // Every distinct key hits the tracker exactly once, found or not.
    assert_eq!(tracker.lookup_count("123"), 1);
    assert_eq!(tracker.lookup_count("345"), 1);
    assert_eq!(tracker.lookup_count("999"), 1);
}

#[tokio::test]
async fn jira_kind_scans_jira_issue_keys() {
    let tracker = StubTracker::new(vec![issue("ABC-123", false)]);
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Jira, BuildOptions::default());
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("fix: one\nABC-123 is done", 1))
        .await;

    assert_eq!(spec.commits[0].issue_ids, vec!["ABC-123"]);
    assert_eq!(spec.issues.len(), 1);
    assert_eq!(spec.issues[0].id, "ABC-123");
}

#[tokio::test]
async fn git_kind_ignores_jira_issue_keys() {
    let tracker = StubTracker::new(vec![issue("ABC-123", false)]);
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, BuildOptions::default());
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("fix: one\nABC-123 is done", 1))
        .await;

    assert!(spec.commits[0].issue_ids.is_empty());
    assert!(spec.issues.is_empty());
    assert_eq!(tracker.lookup_count("ABC-123"), 0);
}

#[tokio::test]
async fn merge_commits_are_skipped_by_default() {
    let tracker = StubTracker::new(vec![issue("123", false)]);
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, BuildOptions::default());
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("Merge pull request #123", 2))
        .await;

    assert!(spec.commits.is_empty());
    assert!(spec.issues.is_empty());
    assert_eq!(tracker.lookup_count("123"), 0);
}

#[tokio::test]
async fn merge_commits_feed_issue_links_when_pr_changelogs_are_on() {
    let tracker = StubTracker::new(vec![issue("123", true)]);
    let options = BuildOptions {
        include_pr_changelog: true,
        ..BuildOptions::default()
    };
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, options);
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("Merge pull request #123", 2))
        .await;

    // The merge itself stays out of the record but its pull request is kept.
    assert!(spec.commits.is_empty());
    assert_eq!(spec.pull_requests.len(), 1);
}

#[tokio::test]
async fn merge_commits_are_recorded_when_included() {
    let tracker = StubTracker::new(Vec::new());
    let options = BuildOptions {
        include_merge_commits: true,
        ..BuildOptions::default()
    };
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, options);
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("Merge branch 'topic'", 2))
        .await;

    assert_eq!(spec.commits.len(), 1);
}

#[tokio::test]
async fn excluded_commits_are_dropped() {
    let tracker = StubTracker::new(Vec::new());
    let options = BuildOptions {
        exclude: Some(Regex::new("^release ").expect("valid regex")),
        ..BuildOptions::default()
    };
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, options);
    let mut spec = ReleaseSpec::default();

    builder
        .add_commit(&mut spec, &commit("release 1.2.3", 1))
        .await;
    builder.add_commit(&mut spec, &commit("fix: kept", 1)).await;

    assert_eq!(spec.commits.len(), 1);
    assert_eq!(spec.commits[0].message, "fix: kept");
}

#[tokio::test]
async fn commit_author_is_carried_into_the_record() {
    let tracker = StubTracker::new(Vec::new());
    let mut builder = ReleaseBuilder::new(&tracker, TrackerKind::Git, BuildOptions::default());
    let mut spec = ReleaseSpec::default();

    builder.add_commit(&mut spec, &commit("fix: one", 1)).await;

    let author = spec.commits[0].author.as_ref().expect("author resolved");
    assert_eq!(author.name, "Test User");
    assert_eq!(author.email, "test@example.com");
    assert!(spec.commits[0].committer.is_none());
}
