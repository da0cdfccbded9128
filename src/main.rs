//! herald - CLI entry point.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{ArgAction, Parser};
use regex_lite::Regex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use herald::changelog::{GroupRegistry, RenderOptions, render};
use herald::error::GitError;
use herald::git::{self, RepoInfo};
use herald::release::{BuildOptions, ReleaseBuilder, ReleaseSpec, dependency_updates};
use herald::tracker::{GitHubTracker, TrackerKind, discover_token};

/// Generate a changelog and release record for a git commit range.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Generate a changelog and release record for a git commit range")]
struct Cli {
    /// Directory of the git repository
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// The revision to start the changelog from
    #[arg(short = 'p', long = "previous-rev")]
    previous_rev: Option<String>,

    /// The date to start the changelog from, in format 'MonthName dayNumber year'
    #[arg(long = "previous-date")]
    previous_date: Option<String>,

    /// The revision to end the changelog at
    #[arg(long)]
    rev: Option<String>,

    /// Prefix to filter on when searching for version tags
    #[arg(long = "tag-prefix")]
    tag_prefix: Option<String>,

    /// The version to release; defaults from the latest tag name
    #[arg(short = 'v', long)]
    version: Option<String>,

    /// Put the changelog markdown in this file
    #[arg(long = "output-markdown")]
    output_markdown: Option<PathBuf>,

    /// Write the release record as YAML to this file
    #[arg(long = "release-yaml")]
    release_yaml: Option<PathBuf>,

    /// Path to the deployment status file used to calculate dependency updates
    #[arg(long = "status-path", default_value = "docs/releases.yaml")]
    status_path: String,

    /// Separator between commit message and changelog in pull request bodies
    #[arg(long = "changelog-separator", env = "CHANGELOG_SEPARATOR", default_value = "-----")]
    changelog_separator: String,

    /// Separator between changelogs taken from pull request bodies
    #[arg(long = "changelog-output-separator", default_value = "-----")]
    changelog_output_separator: String,

    /// Should changelogs embedded in pull request bodies be included
    #[arg(long = "include-changelog", default_value_t = true, action = ArgAction::Set)]
    include_changelog: bool,

    /// Include merge commits when generating the changelog
    #[arg(long = "include-merge-commits")]
    include_merge_commits: bool,

    /// Regexp for excluding commits
    #[arg(
        short = 'e',
        long = "exclude-regexp",
        env = "CHANGELOG_EXCLUDE_REGEXP",
        default_value = "^release "
    )]
    exclude_regexp: String,

    /// Fail when no commits are found in the range
    #[arg(long = "fail-if-no-commits")]
    fail_if_no_commits: bool,

    /// Update the release on the git host with the changelog
    #[arg(long = "update-release", default_value_t = true, action = ArgAction::Set)]
    update_release: bool,

    /// Markdown prepended to the changelog
    #[arg(long)]
    header: Option<String>,

    /// File with markdown prepended to the changelog
    #[arg(long = "header-file")]
    header_file: Option<PathBuf>,

    /// Markdown appended to the changelog
    #[arg(long)]
    footer: Option<String>,

    /// File with markdown appended to the changelog
    #[arg(long = "footer-file")]
    footer_file: Option<PathBuf>,

    /// Print the changelog without writing or publishing anything
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let repo = git::open_repository(&cli.dir).context("failed to open git repository")?;
    let repo_info = repo_info(&repo).context("failed to discover the origin remote")?;

    let prefix = cli.tag_prefix.clone().unwrap_or_else(|| "v".to_string());
    let tags = git::tags_by_creation_desc(&repo, cli.tag_prefix.as_deref().unwrap_or(""))
        .context("failed to list tags")?;

    let previous_rev = match resolve_previous_rev(&cli, &repo, &tags)? {
        Some(rev) => rev,
        None => {
            info!("no previous commit version found so change diff unavailable");
            return Ok(());
        }
    };

    let current_rev = match &cli.rev {
        Some(rev) => rev.clone(),
        None => tags
            .first()
            .map(|tag| tag.commit.to_string())
            .unwrap_or_else(|| "head".to_string()),
    };

    let mut tag_name = tags.first().map(|tag| tag.name.clone()).unwrap_or_default();
    if let Some(version) = &cli.version {
        if *version != tag_name && format!("{prefix}{version}") != tag_name {
            warn!("version {version} does not match the latest tag {tag_name}");
            tag_name = version.clone();
        }
    }
    let version = cli
        .version
        .clone()
        .unwrap_or_else(|| tag_name.strip_prefix(&prefix).unwrap_or(&tag_name).to_string());

    info!("generating changelog from git ref {previous_rev} => {current_rev}");

    let commits = match git::fetch_commits(&repo, &previous_rev, &current_rev) {
        Ok(commits) => commits,
        Err(e @ GitError::NoDiffBetweenReferences { .. }) if !cli.fail_if_no_commits => {
            warn!("{e}");
            Vec::new()
        }
        Err(e) if !cli.fail_if_no_commits => {
            warn!(
                "failed to find git commits between revision {previous_rev} and {current_rev}: {e}"
            );
            Vec::new()
        }
        Err(e) => return Err(e).context("failed to fetch commits"),
    };

    let tracker = GitHubTracker::new(repo_info.clone(), discover_token())
        .context("failed to create issue tracker")?;

    let exclude = if cli.exclude_regexp.is_empty() {
        None
    } else {
        Some(
            Regex::new(&cli.exclude_regexp)
                .with_context(|| format!("invalid regexp for --exclude-regexp: {}", cli.exclude_regexp))?,
        )
    };

    let mut spec = ReleaseSpec {
        name: repo_info.name.clone(),
        version: version.clone(),
        git_owner: repo_info.owner.clone(),
        git_repository: repo_info.name.clone(),
        git_http_url: repo_info.https_url(),
        ..ReleaseSpec::default()
    };

    let mut builder = ReleaseBuilder::new(
        &tracker,
        TrackerKind::Git,
        BuildOptions {
            include_merge_commits: cli.include_merge_commits,
            include_pr_changelog: cli.include_changelog,
            exclude,
        },
    );
    for commit in &commits {
        builder.add_commit(&mut spec, commit).await;
    }

    match dependency_updates(&repo, &cli.dir, &previous_rev, &cli.status_path) {
        Ok(updates) => spec.dependency_updates = updates,
        Err(e) => warn!("failed to get dependency updates: {e}"),
    }

    let mut registry = GroupRegistry::new();
    let options = RenderOptions {
        separator: cli.changelog_separator.clone(),
        output_separator: cli.changelog_output_separator.clone(),
        include_pr_changelog: cli.include_changelog,
        include_merge_commits: cli.include_merge_commits,
    };
    let body = render(&spec, &repo_info, &mut registry, &options);

    let header = template_text(cli.header.as_deref(), cli.header_file.as_deref())
        .context("failed to read header")?;
    let footer = template_text(cli.footer.as_deref(), cli.footer_file.as_deref())
        .context("failed to read footer")?;
    let markdown = format!("{header}{body}{footer}");

    if cli.dry_run {
        println!("{markdown}");
        return Ok(());
    }

    let mut markdown_outputted = false;
    if cli.update_release && !version.is_empty() {
        match tracker.publish_release(&tag_name, &version, &markdown).await {
            Ok(url) => {
                info!("updated the release information at {url}");
                spec.release_notes_url = url;
                markdown_outputted = true;
            }
            Err(e) => warn!("failed to update the release for {}: {e}", repo_info.https_url()),
        }
    }

    if let Some(path) = &cli.output_markdown {
        write_atomic(path, &markdown).context("failed to write changelog markdown")?;
        info!("generated changelog: {}", path.display());
        markdown_outputted = true;
    }
    if !markdown_outputted {
        println!("{markdown}");
    }

    if let Some(path) = &cli.release_yaml {
        // A .json extension switches the envelope; YAML otherwise.
        let record = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(&spec).context("failed to marshal release record")?
        } else {
            serde_yaml::to_string(&spec).context("failed to marshal release record")?
        };
        write_atomic(path, &record).context("failed to write release record")?;
        info!("generated release record: {}", path.display());
    }

    Ok(())
}

/// Repository coordinates taken from the `origin` remote.
fn repo_info(repo: &git2::Repository) -> Result<RepoInfo> {
    let remote = repo.find_remote("origin").context("no 'origin' remote found")?;
    let url = remote.url().context("remote has no URL")?;
    Ok(RepoInfo::from_remote_url(url)?)
}

/// Default the previous revision: explicit flag, then `--previous-date`,
/// then the tag before the latest, then the repository's first commit.
fn resolve_previous_rev(
    cli: &Cli,
    repo: &git2::Repository,
    tags: &[git::TagInfo],
) -> Result<Option<String>> {
    if let Some(rev) = &cli.previous_rev {
        return Ok(Some(rev.clone()));
    }
    if let Some(date_text) = &cli.previous_date {
        let date = NaiveDate::parse_from_str(date_text, "%B %d %Y")
            .with_context(|| format!("failed to parse --previous-date '{date_text}'"))?;
        let cutoff = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
        let Some(oid) = git::revision_before(repo, cutoff)? else {
            bail!("failed to find commits before date {date_text}");
        };
        return Ok(Some(oid.to_string()));
    }
    if tags.len() > 1 {
        return Ok(Some(tags[1].commit.to_string()));
    }
    // let's assume we are the first release
    Ok(git::first_commit(repo)?.map(|oid| oid.to_string()))
}

/// Literal text wins over a file; neither means empty.
fn template_text(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    if let Some(file) = file {
        return std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()));
    }
    Ok(String::new())
}

/// Write through a temp file in the target directory so readers never see a
/// half-written file.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.persist(path)?;
    Ok(())
}
