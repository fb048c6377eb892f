//! Pull-request and release collaborator
//!
//! The pipeline never talks HTTP directly. It asks a [PullRequestSource]
//! which merged pull requests produced a commit and what a numbered pull
//! request looks like, and hands the finished release to a [ReleaseTarget].
//!
//! - [client::GitHubClient]: GitHub REST API over blocking `reqwest`
//! - [mock::MockGitHub]: in-memory double for tests

pub mod client;
pub mod mock;
pub mod slug;

pub use client::GitHubClient;
pub use mock::MockGitHub;
pub use slug::RepositorySlug;

use crate::domain::PullRequestRef;
use crate::error::Result;
use git2::Oid;

/// A pull request fetched by number, with its merge state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetails {
    pub pull_request: PullRequestRef,
    pub merged: bool,
}

/// Release record to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDraft {
    pub tag_name: String,
    pub title: String,
    pub body: String,
    pub draft: bool,
}

/// Release record as created by the collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRelease {
    pub id: u64,
    pub url: String,
}

/// Read access to pull request metadata
pub trait PullRequestSource {
    /// Merged pull requests whose merge produced `commit`, best match first
    ///
    /// An empty list means the commit was not introduced by a pull request.
    fn merged_pull_requests_for_commit(&self, commit: Oid) -> Result<Vec<PullRequestRef>>;

    /// Fetch a pull request by number
    fn pull_request(&self, number: u64) -> Result<PullRequestDetails>;
}

/// Creates externally visible release records
///
/// Not idempotent: calling twice for the same tag is left to the
/// collaborator to reject or duplicate.
pub trait ReleaseTarget {
    fn create_release(&self, release: &ReleaseDraft) -> Result<PublishedRelease>;
}
