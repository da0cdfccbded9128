//! Owned commit snapshots read out of a repository.

use chrono::{DateTime, TimeZone, Utc};

/// Author or committer identity attached to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

impl Signature {
    fn from_git2(sig: &git2::Signature<'_>) -> Self {
        let when = Utc
            .timestamp_opt(sig.when().seconds(), 0)
            .single()
            .unwrap_or_default();
        Self {
            name: sig.name().unwrap_or("").to_string(),
            email: sig.email().unwrap_or("").to_string(),
            when,
        }
    }

    /// True when neither name nor email carries any information.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// A commit detached from the repository it was read from.
///
/// The range resolver hands these out so the rest of the pipeline never
/// touches libgit2 lifetimes.
#[derive(Debug, Clone)]
pub struct Commit {
    pub hash: String,
    pub parent_hashes: Vec<String>,
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
}

impl Commit {
    pub fn from_git2(commit: &git2::Commit<'_>) -> Self {
        Self {
            hash: commit.id().to_string(),
            parent_hashes: commit.parent_ids().map(|id| id.to_string()).collect(),
            message: commit.message().unwrap_or("").to_string(),
            author: Signature::from_git2(&commit.author()),
            committer: Signature::from_git2(&commit.committer()),
        }
    }

    /// A merge commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }
}
