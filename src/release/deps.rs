//! Dependency updates derived from the deployment status file.
//!
//! The status file lists, per namespace, the released components and their
//! versions. Diffing the working-tree copy against the blob recorded at the
//! previous revision yields the dependency updates for this release.

use std::collections::BTreeMap;
use std::path::Path;

use git2::Repository;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;

use super::spec::DependencyUpdate;

/// Released components of one namespace in the status file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceReleases {
    pub namespace: String,
    #[serde(default)]
    pub releases: Vec<ReleaseReport>,
}

/// One released component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseReport {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub repository_url: String,
    #[serde(default)]
    pub application_url: String,
}

/// Compute the dependency updates between `previous_rev` and the working
/// tree. A missing status file means there is nothing to report.
pub fn dependency_updates(
    repo: &Repository,
    workdir: &Path,
    previous_rev: &str,
    status_path: &str,
) -> Result<Vec<DependencyUpdate>, ReportError> {
    let current_path = workdir.join(status_path);
    if !current_path.exists() {
        debug!(path = %current_path.display(), "no dependency status file, skipping updates");
        return Ok(Vec::new());
    }

    let spec = format!("{previous_rev}:{status_path}");
    let object = repo
        .revparse_single(&spec)
        .map_err(|source| ReportError::PreviousStatus {
            spec: spec.clone(),
            source,
        })?;
    let blob = object
        .peel_to_blob()
        .map_err(|source| ReportError::PreviousStatus {
            spec: spec.clone(),
            source,
        })?;
    let previous: Vec<NamespaceReleases> = serde_yaml::from_slice(blob.content())
        .map_err(|source| ReportError::ParseStatus {
            rev: previous_rev.to_string(),
            source,
        })?;

    let current_text =
        std::fs::read_to_string(&current_path).map_err(|source| ReportError::ReadStatus {
            path: current_path.display().to_string(),
            source,
        })?;
    let current: Vec<NamespaceReleases> =
        serde_yaml::from_str(&current_text).map_err(|source| ReportError::ParseStatus {
            rev: "working tree".to_string(),
            source,
        })?;

    Ok(diff_releases(&previous, &current))
}

/// Rows for changed and added components follow the current file's order;
/// removed components trail in namespace/name order with only their old
/// version filled in.
fn diff_releases(
    previous: &[NamespaceReleases],
    current: &[NamespaceReleases],
) -> Vec<DependencyUpdate> {
    let mut previous_map: BTreeMap<&str, BTreeMap<&str, &ReleaseReport>> = BTreeMap::new();
    for nsr in previous {
        let releases = previous_map.entry(nsr.namespace.as_str()).or_default();
        for release in &nsr.releases {
            releases.insert(release.name.as_str(), release);
        }
    }

    let mut updates = Vec::new();
    for nsr in current {
        let previous_releases = previous_map.entry(nsr.namespace.as_str()).or_default();
        for release in &nsr.releases {
            let previous_version = previous_releases
                .remove(release.name.as_str())
                .map(|prev| prev.version.clone())
                .unwrap_or_default();
            if previous_version != release.version {
                let url = if release.repository_url.is_empty() {
                    release.application_url.clone()
                } else {
                    release.repository_url.clone()
                };
                updates.push(DependencyUpdate {
                    component: release.name.clone(),
                    url,
                    from_version: previous_version,
                    to_version: release.version.clone(),
                });
            }
        }
    }

    for releases in previous_map.values() {
        for release in releases.values() {
            updates.push(DependencyUpdate {
                component: release.name.clone(),
                url: String::new(),
                from_version: release.version.clone(),
                to_version: String::new(),
            });
        }
    }

    updates
}
