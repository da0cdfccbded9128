//! Remote URL parsing into host/owner/repository coordinates.

use crate::error::TrackerError;

/// Coordinates of the hosted repository a changelog is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoInfo {
    /// Parse a remote URL in ssh (`git@host:owner/repo.git`) or https
    /// (`https://host/owner/repo[.git]`) form.
    pub fn from_remote_url(url: &str) -> Result<Self, TrackerError> {
        let invalid = || TrackerError::InvalidRemoteUrl(url.to_string());

        if let Some(rest) = url.strip_prefix("git@") {
            let (host, path) = rest.split_once(':').ok_or_else(invalid)?;
            let (owner, name) = split_owner_repo(path).ok_or_else(invalid)?;
            return Ok(Self {
                host: host.to_string(),
                owner,
                name,
            });
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(invalid)?;
        let (host, path) = rest.split_once('/').ok_or_else(invalid)?;
        let (owner, name) = split_owner_repo(path).ok_or_else(invalid)?;
        Ok(Self {
            host: host.to_string(),
            owner,
            name,
        })
    }

    /// Base URL of the git host, e.g. `https://github.com`.
    pub fn host_url(&self) -> String {
        format!("https://{}", self.host)
    }

    /// Browse URL of the repository itself.
    pub fn https_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }

    /// Profile URL for a user login on this host.
    pub fn user_url(&self, login: &str) -> String {
        format!("{}/{}", self.host_url(), login)
    }

    /// URL of the release page for a tag.
    pub fn release_url(&self, tag: &str) -> String {
        format!("{}/releases/tag/{}", self.https_url(), tag)
    }
}

fn split_owner_repo(path: &str) -> Option<(String, String)> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let owner = parts.next()?;
    let name = parts.next()?;
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}
