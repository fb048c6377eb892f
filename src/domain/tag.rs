use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use git2::Oid;
use regex::Regex;

/// A release tag: a rendered version plus the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
    pub commit: Oid,
}

/// Tag naming pattern (e.g., "{version}", "v{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    matcher: Regex,
}

impl TagPattern {
    /// Create a tag pattern; it must contain exactly one `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches("{version}").count() != 1 {
            return Err(ReleaseError::tag(format!(
                "Pattern '{}' must contain exactly one {{version}} placeholder",
                pattern
            )));
        }

        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+)");
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| ReleaseError::tag(format!("Invalid pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Render a version into a tag name
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }

    /// Glob that pre-filters tag names before they are parsed
    pub fn describe_glob(&self) -> String {
        self.pattern.replace("{version}", "*.*.*")
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }

    /// Extract the version from a tag name following this pattern
    pub fn parse_version(&self, tag: &str) -> Result<Version> {
        let captures = self.matcher.captures(tag).ok_or_else(|| {
            ReleaseError::version(format!(
                "Tag '{}' does not match pattern '{}'",
                tag, self.pattern
            ))
        })?;
        let version = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        Version::parse(version)
    }
}
