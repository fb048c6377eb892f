use crate::domain::PullRequestRef;
use crate::error::{ReleaseError, Result};
use crate::github::{
    PublishedRelease, PullRequestDetails, PullRequestSource, ReleaseDraft, ReleaseTarget,
};
use git2::Oid;
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock pull request host for testing without network access
#[derive(Default)]
pub struct MockGitHub {
    pull_requests: HashMap<u64, PullRequestDetails>,
    merges: HashMap<Oid, Vec<u64>>,
    releases: RefCell<Vec<ReleaseDraft>>,
    lookups: RefCell<Vec<Oid>>,
    release_error: Option<String>,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a merged pull request
    pub fn add_pull_request(&mut self, pull_request: PullRequestRef) {
        self.pull_requests.insert(
            pull_request.number,
            PullRequestDetails {
                pull_request,
                merged: true,
            },
        );
    }

    /// Register a pull request that is still open
    pub fn add_open_pull_request(&mut self, pull_request: PullRequestRef) {
        self.pull_requests.insert(
            pull_request.number,
            PullRequestDetails {
                pull_request,
                merged: false,
            },
        );
    }

    /// Record that merging pull request `number` produced `commit`
    ///
    /// Calling this twice for one commit makes the lookup ambiguous.
    pub fn add_merge(&mut self, commit: Oid, number: u64) {
        self.merges.entry(commit).or_default().push(number);
    }

    /// Make `create_release` fail with a 500 response
    pub fn fail_releases(&mut self, reason: impl Into<String>) {
        self.release_error = Some(reason.into());
    }

    /// Releases created so far, in order
    pub fn releases(&self) -> Vec<ReleaseDraft> {
        self.releases.borrow().clone()
    }

    /// Commits looked up through `merged_pull_requests_for_commit`, in order
    pub fn lookups(&self) -> Vec<Oid> {
        self.lookups.borrow().clone()
    }

    fn lookup(&self, number: u64) -> Result<&PullRequestDetails> {
        self.pull_requests
            .get(&number)
            .ok_or_else(|| ReleaseError::github(404, "Not Found"))
    }
}

impl PullRequestSource for MockGitHub {
    fn merged_pull_requests_for_commit(&self, commit: Oid) -> Result<Vec<PullRequestRef>> {
        self.lookups.borrow_mut().push(commit);
        let Some(numbers) = self.merges.get(&commit) else {
            return Ok(Vec::new());
        };
        numbers
            .iter()
            .map(|n| self.lookup(*n).map(|d| d.pull_request.clone()))
            .collect()
    }

    fn pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        self.lookup(number).cloned()
    }
}

impl ReleaseTarget for MockGitHub {
    fn create_release(&self, release: &ReleaseDraft) -> Result<PublishedRelease> {
        if let Some(reason) = &self.release_error {
            return Err(ReleaseError::github(500, reason.clone()));
        }
        let mut releases = self.releases.borrow_mut();
        releases.push(release.clone());
        let id = releases.len() as u64;
        Ok(PublishedRelease {
            id,
            url: format!("https://github.test/releases/tag/{}", release.tag_name),
        })
    }
}
