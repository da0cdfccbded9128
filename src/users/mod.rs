//! Resolution of git identities to tracker user profiles.

use std::collections::HashMap;

use crate::error::TrackerError;
use crate::git::Signature;
use crate::release::UserDetails;
use crate::tracker::IssueTracker;

/// Resolves partial git identities into as-complete-as-possible
/// [`UserDetails`], caching by login so each profile is fetched at most once
/// per run. Git commit signatures usually carry only name and email; the
/// tracker fills in login, profile URL and avatar.
pub struct UserResolver<'a> {
    tracker: &'a dyn IssueTracker,
    cache: HashMap<String, UserDetails>,
}

impl<'a> UserResolver<'a> {
    pub fn new(tracker: &'a dyn IssueTracker) -> Self {
        Self {
            tracker,
            cache: HashMap::new(),
        }
    }

    /// Resolve a commit signature. Signatures without any information
    /// short-circuit to `None`.
    pub async fn resolve_signature(
        &mut self,
        signature: &Signature,
    ) -> Result<Option<UserDetails>, TrackerError> {
        if signature.is_empty() {
            return Ok(None);
        }
        self.resolve(&UserDetails {
            name: signature.name.clone(),
            email: signature.email.clone(),
            ..UserDetails::default()
        })
        .await
    }

    /// Resolve a possibly-partial user record.
    ///
    /// Records without name or login resolve to `None`; records without a
    /// login are returned as-is (there is nothing to look up); otherwise the
    /// tracker profile is merged over the record's empty fields.
    pub async fn resolve(
        &mut self,
        user: &UserDetails,
    ) -> Result<Option<UserDetails>, TrackerError> {
        if user.login.is_empty() && user.name.is_empty() {
            return Ok(None);
        }

        let key = if user.login.is_empty() {
            user.name.clone()
        } else {
            user.login.clone()
        };
        if let Some(cached) = self.cache.get(&key) {
            let mut merged = user.clone();
            merged.merge_from(cached);
            return Ok(Some(merged));
        }

        let mut resolved = user.clone();
        if !user.login.is_empty() {
            if let Some(profile) = self.tracker.find_user(&user.login).await? {
                resolved.merge_from(&profile);
            }
        }
        self.cache.insert(key, resolved.clone());
        Ok(Some(resolved))
    }

    /// Resolve a slice of users, dropping the ones that resolve to nothing.
    pub async fn resolve_all(
        &mut self,
        users: &[UserDetails],
    ) -> Result<Vec<UserDetails>, TrackerError> {
        let mut answer = Vec::new();
        for user in users {
            if let Some(resolved) = self.resolve(user).await? {
                answer.push(resolved);
            }
        }
        Ok(answer)
    }
}
