//! Conventional commit parsing.
//!
//! See <https://conventionalcommits.org/>.

use std::sync::LazyLock;

use regex_lite::Regex;

static CONVENTIONAL_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z-]+)(?:\(([0-9A-Za-z-]+)\))?(!)?: (.+)((?s:.*))").unwrap()
});

static BREAKING_CHANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^BREAKING CHANGE: (.*)").unwrap());

/// Classification parsed out of one commit message.
///
/// An empty `kind` means the message did not match the conventional commit
/// grammar and lands in the unclassified bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitInfo {
    pub kind: String,
    pub scope: String,
    pub description: String,
}

/// Parse a commit message into its primary classification plus an optional
/// breaking-change record.
///
/// This is a total function: unparseable messages degrade to an unclassified
/// `CommitInfo` carrying the whole message as description. A
/// `BREAKING CHANGE:` footer yields a second record with kind `break`
/// attributed to the same commit; with only a `!` marker the primary record
/// itself is reclassified as `break`. When both appear the footer wins and
/// the marker is ignored.
pub fn parse_commit(message: &str) -> (CommitInfo, Option<CommitInfo>) {
    let Some(captures) = CONVENTIONAL_COMMIT.captures(message) else {
        return (
            CommitInfo {
                description: message.to_string(),
                ..CommitInfo::default()
            },
            None,
        );
    };

    let mut info = CommitInfo {
        kind: captures.get(1).map_or("", |m| m.as_str()).to_string(),
        scope: captures.get(2).map_or("", |m| m.as_str()).to_string(),
        description: captures.get(4).map_or("", |m| m.as_str()).to_string(),
    };

    let rest = captures.get(5).map_or("", |m| m.as_str());
    if let Some(breaking) = BREAKING_CHANGE.captures(rest) {
        let breaking = CommitInfo {
            kind: "break".to_string(),
            scope: String::new(),
            description: breaking.get(1).map_or("", |m| m.as_str()).to_string(),
        };
        return (info, Some(breaking));
    }

    if captures.get(3).is_some() {
        info.kind = "break".to_string();
    }
    (info, None)
}
