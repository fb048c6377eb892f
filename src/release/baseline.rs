use crate::domain::{TagPattern, Version};
use crate::error::{ReleaseError, Result};
use crate::git::HistoryStore;
use git2::Oid;
use tracing::info;

/// The last release the new one builds on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    pub version: Version,
    /// Tagged commit, or the root commit when nothing was released yet
    pub commit: Oid,
    pub tag: Option<String>,
}

impl Baseline {
    /// Commit that bounds the history walk, exclusive
    ///
    /// `None` when there is no tag: the root commit itself belongs to the
    /// first release.
    pub fn exclusive_start(&self) -> Option<Oid> {
        self.tag.as_ref().map(|_| self.commit)
    }
}

/// Read the baseline once, before anything else looks at history
///
/// A missing tag is the normal first-release state and yields 0.0.0 at the
/// root commit. Tags that do not follow `pattern` (pre-releases, other
/// prefixes) never count as a baseline.
pub fn read_baseline<H: HistoryStore>(
    history: &H,
    pattern: &TagPattern,
    tip: Oid,
) -> Result<Baseline> {
    let Some(name) = history.latest_reachable_tag(tip, pattern)? else {
        let root = history.root_commit(tip)?;
        info!(root = %root, "no release tag reachable, starting from 0.0.0");
        return Ok(Baseline {
            version: Version::initial(),
            commit: root,
            tag: None,
        });
    };

    let version = pattern.parse_version(&name)?;
    let commit = history
        .find_tag(&name)?
        .ok_or_else(|| ReleaseError::tag(format!("Tag '{}' vanished while reading", name)))?;
    info!(tag = %name, version = %version, "baseline release");

    Ok(Baseline {
        version,
        commit,
        tag: Some(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{mock_oid, MockHistory};

    fn pattern() -> TagPattern {
        TagPattern::new("{version}").unwrap()
    }

    #[test]
    fn test_no_tag_is_zero_at_root() {
        let history = MockHistory::linear(3);
        let baseline = read_baseline(&history, &pattern(), mock_oid(3)).unwrap();
        assert_eq!(baseline.version, Version::new(0, 0, 0));
        assert_eq!(baseline.commit, mock_oid(1));
        assert_eq!(baseline.tag, None);
        assert_eq!(baseline.exclusive_start(), None);
    }

    #[test]
    fn test_nearest_tag_is_baseline() {
        let mut history = MockHistory::linear(5);
        history.add_tag("1.0.0", mock_oid(1));
        history.add_tag("1.2.3", mock_oid(3));

        let baseline = read_baseline(&history, &pattern(), mock_oid(5)).unwrap();
        assert_eq!(baseline.version, Version::new(1, 2, 3));
        assert_eq!(baseline.commit, mock_oid(3));
        assert_eq!(baseline.exclusive_start(), Some(mock_oid(3)));
    }

    #[test]
    fn test_prefixed_pattern() {
        let mut history = MockHistory::linear(2);
        history.add_tag("v2.1.0", mock_oid(1));

        let pattern = TagPattern::new("v{version}").unwrap();
        let baseline = read_baseline(&history, &pattern, mock_oid(2)).unwrap();
        assert_eq!(baseline.version, Version::new(2, 1, 0));
        assert_eq!(baseline.tag.as_deref(), Some("v2.1.0"));
    }

    #[test]
    fn test_nearer_non_release_tags_are_skipped() {
        let mut history = MockHistory::linear(3);
        history.add_tag("1.0.0", mock_oid(1));
        history.add_tag("1.1.0-rc.1", mock_oid(2));
        history.add_tag("v2.0.0", mock_oid(2));
        history.add_tag("1.x.0", mock_oid(3));
        history.add_tag("docs.site.v1", mock_oid(3));

        let baseline = read_baseline(&history, &pattern(), mock_oid(3)).unwrap();
        assert_eq!(baseline.version, Version::new(1, 0, 0));
        assert_eq!(baseline.commit, mock_oid(1));
        assert_eq!(baseline.tag.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_only_non_release_tags_is_first_release() {
        let mut history = MockHistory::linear(2);
        history.add_tag("1.1.0-rc.1", mock_oid(2));

        let baseline = read_baseline(&history, &pattern(), mock_oid(2)).unwrap();
        assert_eq!(baseline.version, Version::initial());
        assert_eq!(baseline.tag, None);
    }
}
