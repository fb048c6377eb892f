use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;

/// GitHub "owner/name" repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    pub owner: String,
    pub name: String,
}

impl RepositorySlug {
    /// Parse an "owner/name" string
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        match text.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepositorySlug {
                    owner: owner.to_string(),
                    name: name.trim_end_matches(".git").to_string(),
                })
            }
            _ => Err(ReleaseError::config(format!(
                "Invalid repository '{}' - expected owner/name",
                text
            ))),
        }
    }

    /// Infer the slug from a GitHub remote URL
    ///
    /// Handles `https://github.com/o/r(.git)`, `git@github.com:o/r(.git)` and
    /// `ssh://git@github.com/o/r(.git)`, including GitHub Enterprise hosts.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let re = Regex::new(
            r"^(?:https?://(?:[^@/]+@)?|ssh://(?:[^@/]+@)?|[^@/]+@)[^/:]+(?::\d+)?[/:]([^/]+)/([^/]+?)(?:\.git)?/?$",
        )
        .ok()?;
        let captures = re.captures(url.trim())?;
        Some(RepositorySlug {
            owner: captures.get(1)?.as_str().to_string(),
            name: captures.get(2)?.as_str().to_string(),
        })
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
