//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;

use git2::{Oid, Repository, Signature};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    counter: Cell<u32>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("failed to init git repo");
        Self {
            dir,
            repo,
            counter: Cell::new(0),
        }
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("failed to create signature")
    }

    /// Write a file relative to the repository root.
    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        std::fs::write(&path, content).expect("failed to write file");
    }

    /// Commit the given file with the given message. Returns the commit OID.
    pub fn commit_file(&self, rel: &str, content: &str, message: &str) -> Oid {
        self.write_file(rel, content);

        let mut index = self.repo.index().expect("failed to open index");
        index
            .add_path(Path::new(rel))
            .expect("failed to add file to index");
        index.write().expect("failed to write index");
        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("failed to find tree");

        let sig = self.signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("failed to create commit")
    }

    /// Create a commit with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let n = self.counter.get();
        self.counter.set(n + 1);
        self.commit_file("test.txt", &format!("{message}\n{n}"), message)
    }

    /// Create a merge-style commit with explicit parents on the current
    /// branch. Returns the commit OID.
    pub fn merge(&self, message: &str, parent_ids: &[Oid]) -> Oid {
        let mut index = self.repo.index().expect("failed to open index");
        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("failed to find tree");

        let parents: Vec<git2::Commit> = parent_ids
            .iter()
            .map(|oid| self.repo.find_commit(*oid).expect("failed to find parent"))
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .expect("failed to create merge commit")
    }

    /// Create a branch pointing at `target`.
    pub fn branch(&self, name: &str, target: Oid) {
        let commit = self.repo.find_commit(target).expect("failed to find commit");
        self.repo
            .branch(name, &commit, false)
            .expect("failed to create branch");
    }

    /// Point HEAD at the named branch without touching the work tree.
    pub fn checkout(&self, name: &str) {
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .expect("failed to set HEAD");
    }

    /// Create a lightweight tag pointing at `target`.
    pub fn tag(&self, name: &str, target: Oid) {
        let object = self
            .repo
            .find_object(target, None)
            .expect("failed to find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("failed to create tag");
    }

    /// OID of the current HEAD commit.
    pub fn head(&self) -> Oid {
        self.repo
            .head()
            .expect("failed to read HEAD")
            .peel_to_commit()
            .expect("failed to peel HEAD")
            .id()
    }
}
