use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic version representation
///
/// Field order matters: the derived `Ord` compares `(major, minor, patch)`
/// lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// The synthetic baseline used when no release tag exists yet
    pub fn initial() -> Self {
        Version::default()
    }

    /// Parse a bare version string ("1.2.3", optionally "v1.2.3")
    ///
    /// Pre-release and build metadata are rejected: release tags produced by
    /// this tool are always plain `X.Y.Z`.
    pub fn parse(text: &str) -> Result<Self> {
        let clean = text.trim().trim_start_matches(['v', 'V']);

        let parsed = semver::Version::parse(clean).map_err(|e| {
            ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z ({})",
                text, e
            ))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "Pre-release or build metadata not supported: '{}'",
                text
            )));
        }

        let component = |value: u64, name: &str| {
            u32::try_from(value).map_err(|_| {
                ReleaseError::version(format!("{} version out of range: {}", name, value))
            })
        };

        Ok(Version {
            major: component(parsed.major, "Major")?,
            minor: component(parsed.minor, "Minor")?,
            patch: component(parsed.patch, "Patch")?,
        })
    }

    /// Bump version according to bump category
    ///
    /// Fails instead of wrapping when the bumped component is already at its
    /// maximum.
    pub fn bump(&self, category: BumpCategory) -> Result<Self> {
        let overflow = || {
            ReleaseError::version(format!(
                "Cannot apply {} bump to {}: out of range",
                category, self
            ))
        };
        Ok(match category {
            BumpCategory::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            BumpCategory::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            BumpCategory::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Severity class of a release
///
/// Variants are declared in ascending severity, so the derived `Ord` yields
/// `Major > Minor > Patch` and `Iterator::max` picks the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpCategory {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpCategory::Patch => "patch",
            BumpCategory::Minor => "minor",
            BumpCategory::Major => "major",
        };
        f.write_str(name)
    }
}
