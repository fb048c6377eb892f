use crate::domain::{ReleaseTag, Version};
use crate::error::Result;
use crate::github::{PublishedRelease, ReleaseDraft, ReleaseTarget};
use tracing::info;

/// Title of the release record for `version`
pub fn release_title(version: &Version) -> String {
    format!("Release {}", version)
}

/// Creates the release record for a freshly created tag
pub struct ReleasePublisher<'a, R: ReleaseTarget> {
    target: &'a R,
    draft: bool,
}

impl<'a, R: ReleaseTarget> ReleasePublisher<'a, R> {
    pub fn new(target: &'a R) -> Self {
        ReleasePublisher {
            target,
            draft: false,
        }
    }

    pub fn draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    pub fn create_release(
        &self,
        tag: &ReleaseTag,
        title: &str,
        body: &str,
    ) -> Result<PublishedRelease> {
        let draft = ReleaseDraft {
            tag_name: tag.name.clone(),
            title: title.to_string(),
            body: body.to_string(),
            draft: self.draft,
        };

        let published = self.target.create_release(&draft)?;
        info!(tag = %tag.name, url = %published.url, "published release");
        Ok(published)
    }
}
