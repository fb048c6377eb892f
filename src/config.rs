use crate::domain::{BumpCategory, TagPattern};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const LOCAL_CONFIG_FILE: &str = "./prrelease.toml";
const USER_CONFIG_FILE: &str = ".prrelease.toml";

/// Represents the complete configuration for pr-release.
///
/// Contains the label table used for bump classification, the GitHub
/// connection settings, and release/tagging behavior.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_labels")]
    pub labels: HashMap<String, BumpCategory>,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Returns the default label-name to bump-category table.
fn default_labels() -> HashMap<String, BumpCategory> {
    let mut map = HashMap::new();
    map.insert("release: major".to_string(), BumpCategory::Major);
    map.insert("release: minor".to_string(), BumpCategory::Minor);
    map.insert("release: patch".to_string(), BumpCategory::Patch);
    map
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Settings for talking to the GitHub REST API.
///
/// `repository` and `api_url` fall back to the `GITHUB_REPOSITORY` and
/// `GITHUB_API_URL` variables that GitHub Actions exports.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitHubConfig {
    /// "owner/name" slug
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub api_url: Option<String>,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            repository: None,
            api_url: None,
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_pattern() -> String {
    "{version}".to_string()
}

fn default_changelog_heading() -> String {
    "## What's Changed".to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration for tagging and release publication.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_changelog_heading")]
    pub changelog_heading: String,

    #[serde(default)]
    pub draft: bool,

    /// Fetch remote tags before reading the baseline
    #[serde(default = "default_true")]
    pub fetch_tags: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            remote: default_remote(),
            tag_pattern: default_tag_pattern(),
            changelog_heading: default_changelog_heading(),
            draft: false,
            fetch_tags: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            labels: default_labels(),
            github: GitHubConfig::default(),
            release: ReleaseConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(ReleaseError::config(
                "[labels] must map at least one label to a bump category",
            ));
        }
        if self.release.remote.trim().is_empty() {
            return Err(ReleaseError::config("release.remote must not be empty"));
        }
        self.tag_pattern()?;
        Ok(())
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.release.tag_pattern.as_str())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `prrelease.toml` in current directory
/// 3. `.prrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label_table() {
        let config = Config::default();
        assert_eq!(
            config.labels.get("release: major"),
            Some(&BumpCategory::Major)
        );
        assert_eq!(
            config.labels.get("release: minor"),
            Some(&BumpCategory::Minor)
        );
        assert_eq!(
            config.labels.get("release: patch"),
            Some(&BumpCategory::Patch)
        );
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::from_toml(
            r#"
[release]
draft = true
"#,
        )
        .unwrap();
        assert!(config.release.draft);
        assert_eq!(config.release.remote, "origin");
        assert!(config.release.fetch_tags);
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.github.timeout_secs, 30);
    }

    #[test]
    fn test_custom_labels_replace_defaults() {
        let config = Config::from_toml(
            r#"
[labels]
"breaking" = "major"
"enhancement" = "minor"
"#,
        )
        .unwrap();
        assert_eq!(config.labels.len(), 2);
        assert_eq!(config.labels.get("breaking"), Some(&BumpCategory::Major));
        assert!(!config.labels.contains_key("release: patch"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = Config::from_toml(
            r#"
[labels]
"breaking" = "huge"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_invalid_tag_pattern_is_rejected() {
        let result = Config::from_toml(
            r#"
[release]
tag_pattern = "release"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_labels_rejected() {
        let result = Config::from_toml("[labels]\n");
        assert!(result.is_err());
    }
}
