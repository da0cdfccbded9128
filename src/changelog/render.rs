//! Deterministic markdown rendering of a release record.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexSet;

use crate::git::RepoInfo;
use crate::release::{CommitSummary, IssueSummary, ReleaseSpec, UserDetails};

use super::groups::GroupRegistry;
use super::parser::{CommitInfo, parse_commit};

/// Rendering knobs.
///
/// `include_merge_commits` gates which commits reach the release record in
/// the first place; the renderer itself never filters.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Marker splitting a pull request body from an embedded changelog.
    pub separator: String,
    /// Marker emitted between embedded changelogs in the output.
    pub output_separator: String,
    /// Append embedded changelogs found in pull request bodies.
    pub include_pr_changelog: bool,
    pub include_merge_commits: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separator: "-----".to_string(),
            output_separator: "-----".to_string(),
            include_pr_changelog: false,
            include_merge_commits: false,
        }
    }
}

/// One changelog section being accumulated: title plus insertion-ordered
/// rendered lines. Duplicate lines collapse to their first occurrence.
struct Section {
    title: String,
    lines: IndexSet<String>,
}

/// Render the markdown changelog for a release record.
///
/// Returns an empty string when there is nothing at all to report. Sections
/// are emitted in ascending group order; the buffer is append-only, so group
/// iteration order is the final document order. The renderer never fails:
/// absent users, urls or issues degrade to plainer output.
pub fn render(
    spec: &ReleaseSpec,
    repo: &RepoInfo,
    registry: &mut GroupRegistry,
    options: &RenderOptions,
) -> String {
    let issue_map: HashMap<&str, &IssueSummary> = spec
        .issues
        .iter()
        .map(|issue| (issue.id.as_str(), issue))
        .collect();

    let mut sections: BTreeMap<i32, Section> = BTreeMap::new();
    let mut has_commit_infos = false;
    for commit in &spec.commits {
        if commit.message.is_empty() {
            continue;
        }
        let (primary, breaking) = parse_commit(&commit.message);
        add_to_section(&mut sections, registry, repo, commit, &primary, &issue_map);
        if let Some(breaking) = breaking {
            add_to_section(&mut sections, registry, repo, commit, &breaking, &issue_map);
        }
        has_commit_infos = true;
    }

    if !has_commit_infos && spec.issues.is_empty() && spec.pull_requests.is_empty() {
        return String::new();
    }

    let mut buffer = String::new();
    buffer.push_str("## Changes in version ");
    buffer.push_str(&spec.version);
    buffer.push('\n');

    let unknown_kind_order = registry.unknown_kind_order();
    let mut has_title = false;
    for (&order, section) in &sections {
        if section.lines.is_empty() {
            continue;
        }
        buffer.push('\n');
        if order != unknown_kind_order || has_title {
            has_title = has_title || order != unknown_kind_order;
            buffer.push_str("### ");
            buffer.push_str(&section.title);
            buffer.push_str("\n\n");
            if order == unknown_kind_order {
                buffer.push_str(
                    "These commits did not use [Conventional Commits](https://conventionalcommits.org/) formatted messages:\n\n",
                );
            }
        }
        for line in &section.lines {
            buffer.push_str(line);
        }
    }

    if !spec.issues.is_empty() {
        buffer.push_str("\n### Issues\n\n");
        for issue in &spec.issues {
            buffer.push_str("* ");
            buffer.push_str(&describe_issue_short(issue));
            buffer.push_str(&issue.title);
            buffer.push_str(&describe_user(repo, issue.user.as_ref()));
            buffer.push('\n');
        }
    }

    if options.include_pr_changelog {
        for pr in &spec.pull_requests {
            if let Some((_, embedded)) = pr.body.split_once(&options.separator) {
                buffer.push('\n');
                buffer.push_str(&options.output_separator);
                buffer.push('\n');
                buffer.push_str(embedded);
            }
        }
    }

    if !spec.dependency_updates.is_empty() {
        buffer.push_str("\n### Dependency Updates\n\n");
        buffer.push_str("| Component | New Version | Old Version |\n");
        buffer.push_str("| --------- | ----------- | ----------- |\n");
        for update in &spec.dependency_updates {
            let component = if update.url.is_empty() {
                update.component.clone()
            } else {
                format!("[{}]({})", update.component, update.url)
            };
            buffer.push_str(&format!(
                "| {} | {} | {} |\n",
                component, update.to_version, update.from_version
            ));
        }
    }

    buffer
}

fn add_to_section(
    sections: &mut BTreeMap<i32, Section>,
    registry: &mut GroupRegistry,
    repo: &RepoInfo,
    commit: &CommitSummary,
    info: &CommitInfo,
    issue_map: &HashMap<&str, &IssueSummary>,
) {
    let line = format!("* {}\n", describe_commit(repo, commit, info, issue_map));
    let group = registry.group_for(&info.kind);
    sections
        .entry(group.order)
        .or_insert_with(|| Section {
            title: group.title,
            lines: IndexSet::new(),
        })
        .lines
        .insert(line);
}

fn describe_commit(
    repo: &RepoInfo,
    commit: &CommitSummary,
    info: &CommitInfo,
    issue_map: &HashMap<&str, &IssueSummary>,
) -> String {
    let prefix = if info.scope.is_empty() {
        String::new()
    } else {
        format!("{}: ", info.scope)
    };
    let first_line = info.description.trim().lines().next().unwrap_or("");

    let user = commit.author.as_ref().or(commit.committer.as_ref());

    let mut issue_text = String::new();
    for id in &commit.issue_ids {
        if let Some(issue) = issue_map.get(id.as_str()) {
            issue_text.push(' ');
            issue_text.push_str(&describe_issue_short(issue));
        }
    }

    format!(
        "{}{}{}{}",
        prefix,
        first_line,
        describe_user(repo, user),
        issue_text
    )
}

/// Short link for an issue id. The `#` prefix is only added for numeric ids
/// so tracker keys like `ABC-123` stay verbatim.
fn describe_issue_short(issue: &IssueSummary) -> String {
    let prefix = if !issue.id.is_empty() && issue.id.parse::<i64>().is_ok() {
        "#"
    } else {
        ""
    };
    format!("[{}{}]({}) ", prefix, issue.id, issue.url)
}

/// ` ([label](url))` decoration for a user, degrading to a bare label when no
/// profile URL is resolvable and to nothing when there is no user at all.
/// The label prefers the login over the display name.
fn describe_user(repo: &RepoInfo, user: Option<&UserDetails>) -> String {
    let Some(user) = user else {
        return String::new();
    };
    let label = if user.login.is_empty() {
        user.name.as_str()
    } else {
        user.login.as_str()
    };
    let mut url = user.url.clone();
    if url.is_empty() && !user.login.is_empty() {
        url = repo.user_url(&user.login);
    }
    let text = if url.is_empty() {
        label.to_string()
    } else if !label.is_empty() {
        format!("[{label}]({url})")
    } else {
        String::new()
    };
    if text.is_empty() {
        String::new()
    } else {
        format!(" ({text})")
    }
}
