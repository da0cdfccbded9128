//! End-to-end markdown rendering scenarios.

use pretty_assertions::assert_eq;

use herald::changelog::{GroupRegistry, RenderOptions, render};
use herald::git::RepoInfo;
use herald::release::{CommitSummary, IssueSummary, ReleaseSpec, UserDetails};

fn repo_info() -> RepoInfo {
    RepoInfo {
        host: "github.com".to_string(),
        owner: "jstrachan".to_string(),
        name: "foo".to_string(),
    }
}

fn user(name: &str, login: &str) -> Option<UserDetails> {
    Some(UserDetails {
        name: name.to_string(),
        login: login.to_string(),
        ..UserDetails::default()
    })
}

#[test]
fn changelog_markdown_without_conventional_commits() {
    let spec = ReleaseSpec {
        version: "1".to_string(),
        commits: vec![
            CommitSummary {
                message: "some commit 1\nfixes #123".to_string(),
                sha: "123".to_string(),
                author: user("James Strachan", "jstrachan"),
                ..CommitSummary::default()
            },
            CommitSummary {
                message: "some commit 2\nfixes #345".to_string(),
                sha: "456".to_string(),
                author: user("James Rawlings", "rawlingsj"),
                ..CommitSummary::default()
            },
        ],
        ..ReleaseSpec::default()
    };

    let mut registry = GroupRegistry::new();
    let markdown = render(&spec, &repo_info(), &mut registry, &RenderOptions::default());

    // A changelog consisting solely of unclassified commits gets neither the
    // "Other Changes" heading nor the explanatory sentence.
    let expected = "## Changes in version 1

* some commit 1 ([jstrachan](https://github.com/jstrachan))
* some commit 2 ([rawlingsj](https://github.com/rawlingsj))
";
    assert_eq!(expected, markdown);
}

fn conventional_spec() -> ReleaseSpec {
    ReleaseSpec {
        version: "2".to_string(),
        commits: vec![
            CommitSummary {
                message: "fix: some commit 1\nfixes #123".to_string(),
                sha: "123".to_string(),
                author: user("James Strachan", "jstrachan"),
                ..CommitSummary::default()
            },
            CommitSummary {
                message: "feat: some commit 2\nfixes #345\n loremm ipsum\nBREAKING CHANGE: The git has fobbed!\n"
                    .to_string(),
                sha: "456".to_string(),
                author: user("James Rawlings", "rawlingsj"),
                issue_ids: vec!["345".to_string()],
                ..CommitSummary::default()
            },
            CommitSummary {
                message: "feat(actual-feature-name)!: some commit 3\nfixes #456".to_string(),
                sha: "567".to_string(),
                author: user("James Rawlings", "rawlingsj"),
                issue_ids: vec!["456".to_string()],
                ..CommitSummary::default()
            },
            CommitSummary {
                message: "bad comment 4, see http://some.url/".to_string(),
                sha: "678".to_string(),
                author: user("James Rawlings", "rawlingsj"),
                ..CommitSummary::default()
            },
            CommitSummary {
                message: "fresh eggs: bad comment 5".to_string(),
                sha: "678".to_string(),
                author: user("James Rawlings", "rawlingsj"),
                ..CommitSummary::default()
            },
            CommitSummary {
                message: "FOO-123: some other kind of commit\nFixes #345".to_string(),
                issue_ids: vec!["345".to_string()],
                ..CommitSummary::default()
            },
        ],
        issues: vec![
            IssueSummary {
                id: "456".to_string(),
                title: "This needs to be fixed ASAP!".to_string(),
                user: user("James Strachan", "jstrachan"),
                url: "http://url-to-issue/456".to_string(),
                ..IssueSummary::default()
            },
            IssueSummary {
                id: "345".to_string(),
                title: "The shit has hit the fan!".to_string(),
                user: user("Mårten Svantesson", "msvticket"),
                url: "http://url-to-issue/345".to_string(),
                ..IssueSummary::default()
            },
        ],
        pull_requests: vec![IssueSummary {
            id: "789".to_string(),
            title: "Upgrade of foo/bar to 1.2.3".to_string(),
            body: "Bumps foo/bar from 1.2.2 to 1.2.3.
-----
# bar

## Changes in version 1.2.3

### New Features

* The bar is open!
"
            .to_string(),
            user: user("Ankit", "ankit"),
            url: "http://url-to-pull/789".to_string(),
            is_pull_request: true,
            ..IssueSummary::default()
        }],
        ..ReleaseSpec::default()
    }
}

const EXPECTED_CONVENTIONAL: &str = "## Changes in version 2

### FOO-123

* some other kind of commit [#345](http://url-to-issue/345) 

### BREAKING CHANGES

* The git has fobbed! ([rawlingsj](https://github.com/rawlingsj)) [#345](http://url-to-issue/345) 
* actual-feature-name: some commit 3 ([rawlingsj](https://github.com/rawlingsj)) [#456](http://url-to-issue/456) 

### New Features

* some commit 2 ([rawlingsj](https://github.com/rawlingsj)) [#345](http://url-to-issue/345) 

### Bug Fixes

* some commit 1 ([jstrachan](https://github.com/jstrachan))

### Other Changes

These commits did not use [Conventional Commits](https://conventionalcommits.org/) formatted messages:

* bad comment 4, see http://some.url/ ([rawlingsj](https://github.com/rawlingsj))
* fresh eggs: bad comment 5 ([rawlingsj](https://github.com/rawlingsj))

### Issues

* [#456](http://url-to-issue/456) This needs to be fixed ASAP! ([jstrachan](https://github.com/jstrachan))
* [#345](http://url-to-issue/345) The shit has hit the fan! ([msvticket](https://github.com/msvticket))

-----

# bar

## Changes in version 1.2.3

### New Features

* The bar is open!
";

fn pr_changelog_options() -> RenderOptions {
    RenderOptions {
        separator: "-----".to_string(),
        output_separator: "-----".to_string(),
        include_pr_changelog: true,
        include_merge_commits: false,
    }
}

#[test]
fn changelog_markdown_with_conventional_commits() {
    let spec = conventional_spec();
    let mut registry = GroupRegistry::new();
    let markdown = render(&spec, &repo_info(), &mut registry, &pr_changelog_options());
    assert_eq!(EXPECTED_CONVENTIONAL, markdown);
}

#[test]
fn rendering_is_idempotent_for_a_shared_registry() {
    let spec = conventional_spec();
    let repo = repo_info();
    let options = pr_changelog_options();

    // Same registry reused: the unknown kind keeps its order.
    let mut registry = GroupRegistry::new();
    let first = render(&spec, &repo, &mut registry, &options);
    let second = render(&spec, &repo, &mut registry, &options);
    assert_eq!(first, second);

    // A reset registry reproduces the original output from scratch.
    registry.reset();
    let after_reset = render(&spec, &repo, &mut registry, &options);
    assert_eq!(first, after_reset);
    assert_eq!(EXPECTED_CONVENTIONAL, after_reset);
}

#[test]
fn other_changes_heading_needs_a_preceding_classified_section() {
    let plain = CommitSummary {
        message: "bad comment, not conventional".to_string(),
        sha: "111".to_string(),
        author: user("James Rawlings", "rawlingsj"),
        ..CommitSummary::default()
    };
    let classified = CommitSummary {
        message: "fix: a real fix".to_string(),
        sha: "222".to_string(),
        author: user("James Rawlings", "rawlingsj"),
        ..CommitSummary::default()
    };

    // Heading-absent: only unclassified commits.
    let spec = ReleaseSpec {
        version: "3".to_string(),
        commits: vec![plain.clone()],
        ..ReleaseSpec::default()
    };
    let mut registry = GroupRegistry::new();
    let markdown = render(&spec, &repo_info(), &mut registry, &RenderOptions::default());
    assert!(!markdown.contains("### Other Changes"));
    assert!(!markdown.contains("These commits did not use"));
    assert!(markdown.contains("* bad comment, not conventional"));

    // Heading-present: a classified section came first.
    let spec = ReleaseSpec {
        version: "3".to_string(),
        commits: vec![plain, classified],
        ..ReleaseSpec::default()
    };
    let mut registry = GroupRegistry::new();
    let markdown = render(&spec, &repo_info(), &mut registry, &RenderOptions::default());
    assert!(markdown.contains("### Bug Fixes"));
    assert!(markdown.contains("### Other Changes"));
    assert!(markdown.contains("These commits did not use"));
}
