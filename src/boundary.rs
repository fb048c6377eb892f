use std::fmt;

/// Non-fatal conditions met while deciding a release.
/// These never stop the pipeline but should be reported to the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Fetching tags from the remote failed; local tags are used instead
    FetchFailed { remote: String, reason: String },
    /// A commit matched several merged pull requests; the first one is used
    AmbiguousCommit {
        commit: String,
        chosen: u64,
        candidates: Vec<u64>,
    },
    /// A pull request named in a manual trigger has not been merged
    UnmergedPullRequest { number: u64 },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch tags from remote '{}': {}. Using local tags.",
                    remote, reason
                )
            }
            BoundaryWarning::AmbiguousCommit {
                commit,
                chosen,
                candidates,
            } => {
                let short_hash = commit.get(..7).unwrap_or(commit.as_str());
                let listed = candidates
                    .iter()
                    .map(|n| format!("#{}", n))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Commit {} matches several merged pull requests ({}); using #{}",
                    short_hash, listed, chosen
                )
            }
            BoundaryWarning::UnmergedPullRequest { number } => {
                write!(f, "Pull request #{} is not merged", number)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_display() {
        let warning = BoundaryWarning::FetchFailed {
            remote: "origin".to_string(),
            reason: "authentication required".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("'origin'"));
        assert!(msg.contains("authentication required"));
    }

    #[test]
    fn test_ambiguous_commit_shortens_hash() {
        let warning = BoundaryWarning::AmbiguousCommit {
            commit: "abc1234def5678".to_string(),
            chosen: 4,
            candidates: vec![4, 9],
        };
        let msg = warning.to_string();
        assert!(msg.contains("abc1234 "));
        assert!(!msg.contains("abc1234d"));
        assert!(msg.contains("#4, #9"));
        assert!(msg.ends_with("using #4"));
    }

    #[test]
    fn test_ambiguous_commit_short_hash_kept() {
        let warning = BoundaryWarning::AmbiguousCommit {
            commit: "abc".to_string(),
            chosen: 1,
            candidates: vec![1, 2],
        };
        assert!(warning.to_string().contains("Commit abc matches"));
    }

    #[test]
    fn test_unmerged_display() {
        let warning = BoundaryWarning::UnmergedPullRequest { number: 12 };
        assert_eq!(warning.to_string(), "Pull request #12 is not merged");
    }
}
