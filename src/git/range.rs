//! Commit range resolution.
//!
//! Given two reference strings, computes the ordered list of commits
//! reachable from `to` but not from `from`. The ancestry of `from` is built
//! breadth-first; the diff walk is an explicit-stack depth-first traversal so
//! that a newly discovered parent is fully explored before siblings queued
//! earlier. That reproduces the "most recent first" ordering of a typical
//! `git log from..to` listing and is a deliberate choice, not a generic
//! graph-walk artifact.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use git2::{ErrorCode, Oid, Repository};

use crate::error::GitError;

use super::commits::Commit;

/// Open the repository at `path`.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    Repository::open(path).map_err(|source| GitError::RepositoryPath {
        path: path.display().to_string(),
        source,
    })
}

/// Retrieve the commits in the range `from_ref..to_ref`.
///
/// Fails with [`GitError::NoDiffBetweenReferences`] when the range is empty,
/// either because `to` is an ancestor of `from` (or equal to it) or because
/// every reachable commit is shared. Never returns a partial list.
pub fn fetch_commits(
    repo: &Repository,
    from_ref: &str,
    to_ref: &str,
) -> Result<Vec<Commit>, GitError> {
    let from = resolve_ref(repo, from_ref)?;
    let to = resolve_ref(repo, to_ref)?;

    let ancestry = ancestry_set(repo, from)?;
    if ancestry.contains(&to.to_string()) {
        return Err(GitError::NoDiffBetweenReferences {
            from: from_ref.to_string(),
            to: to_ref.to_string(),
        });
    }

    let commits = diff_commits(repo, to, &ancestry)?;
    if commits.is_empty() {
        return Err(GitError::NoDiffBetweenReferences {
            from: from_ref.to_string(),
            to: to_ref.to_string(),
        });
    }
    Ok(commits)
}

/// Resolve a reference string to a commit id.
///
/// Resolution order: the literal `head` (case-insensitive) as the current
/// branch tip, then an exact match against any local reference short name,
/// then the string interpreted as a raw hash.
pub fn resolve_ref(repo: &Repository, reference: &str) -> Result<Oid, GitError> {
    if reference.eq_ignore_ascii_case("head") {
        if let Ok(head) = repo.head() {
            if let Ok(commit) = head.peel_to_commit() {
                return Ok(commit.id());
            }
        }
    }

    if let Ok(references) = repo.references() {
        for entry in references.flatten() {
            if entry.shorthand() == Some(reference) {
                if let Ok(commit) = entry.peel_to_commit() {
                    return Ok(commit.id());
                }
            }
        }
    }

    if let Ok(oid) = Oid::from_str(reference) {
        if repo.find_commit(oid).is_ok() {
            return Ok(oid);
        }
    }

    Err(GitError::ReferenceNotFound {
        reference: reference.to_string(),
    })
}

/// Collect every commit hash reachable from `start` by following parent
/// edges, breadth-first. Missing objects are tolerated so shallow histories
/// can still be walked; any other lookup failure aborts the traversal.
fn ancestry_set(repo: &Repository, start: Oid) -> Result<HashSet<String>, GitError> {
    let mut queue = VecDeque::from([start]);
    let mut seen = HashSet::from([start.to_string()]);

    while let Some(oid) = queue.pop_front() {
        let commit = match repo.find_commit(oid) {
            Ok(commit) => commit,
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(GitError::TreeBrowsing(e)),
        };
        for parent in commit.parent_ids() {
            if seen.insert(parent.to_string()) {
                queue.push_back(parent);
            }
        }
    }

    Ok(seen)
}

/// Walk from `start` and collect every commit whose hash is not in
/// `exclusion`, in first-visit order. Excluded commits are still traversed
/// through so shared ancestry behind them is reached exactly once.
fn diff_commits(
    repo: &Repository,
    start: Oid,
    exclusion: &HashSet<String>,
) -> Result<Vec<Commit>, GitError> {
    let mut commits = Vec::new();
    let mut stack = vec![start];
    let mut seen = HashSet::from([start.to_string()]);

    while let Some(oid) = stack.pop() {
        let commit = match repo.find_commit(oid) {
            Ok(commit) => commit,
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(GitError::TreeBrowsing(e)),
        };
        if !exclusion.contains(&oid.to_string()) {
            commits.push(Commit::from_git2(&commit));
        }
        for parent in commit.parent_ids() {
            if seen.insert(parent.to_string()) {
                stack.push(parent);
            }
        }
    }

    Ok(commits)
}
