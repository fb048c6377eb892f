use crate::domain::{ReleaseTag, TagPattern, Version};
use crate::error::{ReleaseError, Result};
use crate::git::HistoryStore;
use crate::release::release_title;
use git2::Oid;
use tracing::{info, warn};

/// Result of asking for a release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tag created locally and pushed
    Created(ReleaseTag),
    /// Tag was already there; nothing was done
    AlreadyExists(ReleaseTag),
    /// Dry run: the tag would have been created
    Planned(ReleaseTag),
}

impl TagOutcome {
    pub fn tag(&self) -> &ReleaseTag {
        match self {
            TagOutcome::Created(tag)
            | TagOutcome::AlreadyExists(tag)
            | TagOutcome::Planned(tag) => tag,
        }
    }
}

/// Idempotent tag creation
///
/// The existence check is a plain read before the write. It guards against a
/// retried trigger, not against two runs racing; for that the store's own
/// refusal to overwrite a tag is relied upon, and reported the same way.
/// A tag that could not be pushed is deleted again, so a retry starts over.
pub struct TagPublisher<'a, H: HistoryStore> {
    history: &'a H,
    pattern: &'a TagPattern,
    remote: &'a str,
    dry_run: bool,
}

impl<'a, H: HistoryStore> TagPublisher<'a, H> {
    pub fn new(history: &'a H, pattern: &'a TagPattern, remote: &'a str) -> Self {
        TagPublisher {
            history,
            pattern,
            remote,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create and push the tag for `version` at `commit`, unless it exists
    pub fn publish(&self, version: Version, commit: Oid) -> Result<TagOutcome> {
        let name = self.pattern.format(&version);

        if let Some(existing) = self.history.find_tag(&name)? {
            info!(tag = %name, commit = %existing, "tag already exists, skipping");
            return Ok(TagOutcome::AlreadyExists(ReleaseTag {
                name,
                version,
                commit: existing,
            }));
        }

        let tag = ReleaseTag {
            name,
            version,
            commit,
        };

        if self.dry_run {
            return Ok(TagOutcome::Planned(tag));
        }

        match self
            .history
            .create_tag(&tag.name, commit, &release_title(&version))
        {
            Ok(()) => {}
            Err(ReleaseError::TagExists(_)) => {
                warn!(tag = %tag.name, "tag appeared between check and create");
                let existing = self.history.find_tag(&tag.name)?.unwrap_or(commit);
                return Ok(TagOutcome::AlreadyExists(ReleaseTag {
                    commit: existing,
                    ..tag
                }));
            }
            Err(e) => return Err(e),
        }
        info!(tag = %tag.name, %commit, "created tag");

        if let Err(e) = self.history.push_tag(self.remote, &tag.name) {
            warn!(tag = %tag.name, error = %e, "push failed, removing local tag");
            if let Err(cleanup) = self.history.delete_tag(&tag.name) {
                warn!(tag = %tag.name, error = %cleanup, "could not remove local tag");
            }
            return Err(e);
        }
        info!(tag = %tag.name, remote = self.remote, "pushed tag");

        Ok(TagOutcome::Created(tag))
    }
}
