//! Git history abstraction layer
//!
//! The release pipeline reads tags and first-parent history and writes
//! exactly one tag per release. Those operations are expressed by the
//! [HistoryStore] trait so the pipeline can run against a real repository or
//! an in-memory double:
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockHistory]: in-memory linear history for tests
//!
//! ```rust
//! # use pr_release::domain::TagPattern;
//! # use pr_release::git::HistoryStore;
//! # fn example<H: HistoryStore>(history: &H) -> pr_release::Result<()> {
//! let tip = history.resolve_commit("HEAD")?;
//! let pattern = TagPattern::new("v{version}")?;
//! let latest = history.latest_reachable_tag(tip, &pattern)?;
//! let commits = history.first_parent_commits(None, tip)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockHistory;
pub use repository::Git2Repository;

use crate::domain::TagPattern;
use crate::error::Result;
use git2::Oid;

/// History-store operations the release pipeline depends on
///
/// ## Error Handling
///
/// Implementations map store failures to [crate::error::ReleaseError].
/// `create_tag` must report a name collision as
/// [crate::error::ReleaseError::TagExists] so callers can treat it as an
/// idempotent no-op.
pub trait HistoryStore {
    /// Resolve a revision expression ("HEAD", a branch, a sha) to a commit
    fn resolve_commit(&self, rev: &str) -> Result<Oid>;

    /// Nearest release tag on the first-parent line of `tip`
    ///
    /// Only tags that follow `pattern` and parse as a version count; anything
    /// else (pre-releases, other prefixes) is passed over, so a stray tag can
    /// never hide an older release. When one commit carries several release
    /// tags, the highest version wins.
    ///
    /// # Returns
    /// * `Ok(Some(name))` - The nearest release tag
    /// * `Ok(None)` - No release tag on the first-parent line
    fn latest_reachable_tag(&self, tip: Oid, pattern: &TagPattern) -> Result<Option<String>>;

    /// First-parent commits from `exclusive_from` (not included) to `tip`
    /// (included), oldest first
    ///
    /// With `exclusive_from = None` the walk runs down to the root commit,
    /// which is included.
    fn first_parent_commits(&self, exclusive_from: Option<Oid>, tip: Oid) -> Result<Vec<Oid>>;

    /// The first-parent root commit of `tip`
    fn root_commit(&self, tip: Oid) -> Result<Oid>;

    /// Commit a tag points at, or `None` if the tag doesn't exist
    fn find_tag(&self, name: &str) -> Result<Option<Oid>>;

    /// Create an annotated tag at `commit`
    fn create_tag(&self, name: &str, commit: Oid, message: &str) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Push a single tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Fetch all tags from a remote
    fn fetch_tags(&self, remote: &str) -> Result<()>;
}
