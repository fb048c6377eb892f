use crate::domain::{ChangeSet, PullRequestRef};
use std::fmt;

/// Line used when a release has no pull requests
pub const NO_CHANGES_LINE: &str = "- No changes in this release.";

/// Rendered changelog, one line per pull request in change set order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    lines: Vec<String>,
}

fn render_line(pull_request: &PullRequestRef) -> String {
    format!(
        "- {} ([#{}]({})) by @{}",
        pull_request.title.trim(),
        pull_request.number,
        pull_request.url,
        pull_request.author
    )
}

/// Render a changelog for `change_set`
pub fn render(change_set: &ChangeSet) -> Changelog {
    if change_set.is_empty() {
        return Changelog {
            lines: vec![NO_CHANGES_LINE.to_string()],
        };
    }
    Changelog {
        lines: change_set.iter().map(render_line).collect(),
    }
}

impl Changelog {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Release body: the changelog under `heading`
    pub fn body(&self, heading: &str) -> String {
        format!("{}\n\n{}\n", heading, self)
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}
