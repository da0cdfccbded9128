//! Tag enumeration and revision defaulting helpers.

use chrono::{DateTime, TimeZone, Utc};
use git2::{Oid, Repository, Sort};
use semver::Version;
use tracing::debug;

use crate::error::GitError;

/// A tag resolved down to the commit it points at.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    /// Commit the tag points at, with annotated tags peeled.
    pub commit: Oid,
    /// Creation date: tagger time for annotated tags, commit time otherwise.
    pub created: DateTime<Utc>,
    pub version: Option<Version>,
}

/// List tags whose name starts with `prefix`, newest first by creation date.
pub fn tags_by_creation_desc(repo: &Repository, prefix: &str) -> Result<Vec<TagInfo>, GitError> {
    let glob = format!("refs/tags/{prefix}*");
    let refs = repo.references_glob(&glob).map_err(GitError::ListTags)?;

    let mut tags = Vec::new();
    for entry in refs.flatten() {
        let Some(name) = entry.shorthand().map(str::to_string) else {
            continue;
        };
        let Ok(commit) = entry.peel_to_commit() else {
            debug!(tag = %name, "skipping tag that does not point at a commit");
            continue;
        };
        let created = match entry.target().and_then(|oid| repo.find_tag(oid).ok()) {
            Some(tag) => tag
                .tagger()
                .map(|sig| sig.when().seconds())
                .unwrap_or_else(|| commit.time().seconds()),
            None => commit.time().seconds(),
        };
        let created = Utc.timestamp_opt(created, 0).single().unwrap_or_default();
        let version = version_from_tag(&name);
        tags.push(TagInfo {
            name,
            commit: commit.id(),
            created,
            version,
        });
    }

    tags.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.name.cmp(&a.name)));
    Ok(tags)
}

/// The most recently created tag matching `prefix`, if any.
pub fn latest_tag(repo: &Repository, prefix: &str) -> Result<Option<TagInfo>, GitError> {
    Ok(tags_by_creation_desc(repo, prefix)?.into_iter().next())
}

/// The hash of the repository's first (root) commit reachable from HEAD.
pub fn first_commit(repo: &Repository) -> Result<Option<Oid>, GitError> {
    let Ok(head) = repo.head() else {
        return Ok(None);
    };
    let Some(start) = head.target() else {
        return Ok(None);
    };

    let mut revwalk = repo.revwalk().map_err(GitError::TreeBrowsing)?;
    revwalk.push(start).map_err(GitError::TreeBrowsing)?;
    for oid in revwalk {
        let oid = oid.map_err(GitError::TreeBrowsing)?;
        let commit = repo.find_commit(oid).map_err(GitError::TreeBrowsing)?;
        if commit.parent_count() == 0 {
            return Ok(Some(oid));
        }
    }
    Ok(None)
}

/// The most recent commit strictly older than `cutoff`, walking from HEAD in
/// commit-time order. Mirrors `git rev-list -1 --before=<date> <branch>`.
pub fn revision_before(repo: &Repository, cutoff: DateTime<Utc>) -> Result<Option<Oid>, GitError> {
    let Ok(head) = repo.head() else {
        return Ok(None);
    };
    let Some(start) = head.target() else {
        return Ok(None);
    };

    let mut revwalk = repo.revwalk().map_err(GitError::TreeBrowsing)?;
    revwalk.push(start).map_err(GitError::TreeBrowsing)?;
    revwalk.set_sorting(Sort::TIME).map_err(GitError::TreeBrowsing)?;
    for oid in revwalk {
        let oid = oid.map_err(GitError::TreeBrowsing)?;
        let commit = repo.find_commit(oid).map_err(GitError::TreeBrowsing)?;
        let when = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_default();
        if when < cutoff {
            return Ok(Some(oid));
        }
    }
    Ok(None)
}

/// Extract a semver version from a tag name, handling both `v1.2.3` and
/// `1.2.3` forms.
pub fn version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}
