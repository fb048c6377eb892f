use crate::error::{ReleaseError, Result};

/// A merged pull request as seen by the release pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub url: String,
    pub labels: Vec<String>,
}

impl PullRequestRef {
    /// Create a pull request reference without labels
    pub fn new(
        number: u64,
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        PullRequestRef {
            number,
            title: title.into(),
            author: author.into(),
            url: url.into(),
            labels: Vec::new(),
        }
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// Parse an operator-supplied list such as `"5, 7,#12,,"`
///
/// Blank entries are discarded and a leading `#` is accepted. Duplicates are
/// kept here; `ChangeSet` collapses them.
pub fn parse_pull_request_list(input: &str) -> Result<Vec<u64>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .trim_start_matches('#')
                .parse::<u64>()
                .map_err(|_| {
                    ReleaseError::InvalidPullRequestList(format!(
                        "'{}' is not a pull request number",
                        entry
                    ))
                })
        })
        .collect()
}
