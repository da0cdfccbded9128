//! Display grouping of commit kinds.

use std::collections::HashMap;

/// A changelog section: human-readable title plus sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitGroup {
    pub title: String,
    pub order: i32,
}

/// Titles for the well-known Conventional Commit kinds, in render order.
/// The empty kind collects commits that did not match the grammar.
const KNOWN_KINDS: [(&str, &str); 11] = [
    ("break", "BREAKING CHANGES"),
    ("feat", "New Features"),
    ("fix", "Bug Fixes"),
    ("perf", "Performance Improvements"),
    ("refactor", "Code Refactoring"),
    ("docs", "Documentation"),
    ("test", "Tests"),
    ("revert", "Reverts"),
    ("style", "Styles"),
    ("chore", "Chores"),
    ("", "Other Changes"),
];

/// Append-only mapping from commit kind to [`CommitGroup`].
///
/// Well-known kinds are seeded with ascending orders; kinds discovered at
/// runtime get descending negative orders so the most recently invented kind
/// sorts first. One registry spans one rendering pass; construct a fresh one
/// per pass when reproducible unknown-kind ordering matters.
#[derive(Debug)]
pub struct GroupRegistry {
    groups: HashMap<String, CommitGroup>,
    unknown_counter: i32,
    unknown_kind_order: i32,
}

impl GroupRegistry {
    pub fn new() -> Self {
        let mut groups = HashMap::new();
        let mut order = 0;
        for (kind, title) in KNOWN_KINDS {
            order += 1;
            groups.insert(
                kind.to_string(),
                CommitGroup {
                    title: title.to_string(),
                    order,
                },
            );
        }
        Self {
            groups,
            unknown_counter: 0,
            unknown_kind_order: order,
        }
    }

    /// Order of the unclassified (empty-kind) group; the largest order any
    /// group in this registry can have.
    pub fn unknown_kind_order(&self) -> i32 {
        self.unknown_kind_order
    }

    /// Look up the group for a kind, case-insensitively, registering a new
    /// group titled with the kind's original casing on first sight.
    pub fn group_for(&mut self, kind: &str) -> CommitGroup {
        let key = kind.to_lowercase();
        if let Some(group) = self.groups.get(&key) {
            return group.clone();
        }
        // Unknown kinds sort first: if you invent a kind for yourself it is
        // probably important to you.
        self.unknown_counter -= 1;
        let group = CommitGroup {
            title: kind.to_string(),
            order: self.unknown_counter,
        };
        self.groups.insert(key, group.clone());
        group
    }

    /// Drop every runtime-discovered kind, returning to the seeded state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
