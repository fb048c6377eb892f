use thiserror::Error;

/// Unified error type for pr-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {message}")]
    GitHub { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Tag '{0}' already exists")]
    TagExists(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Invalid pull request list: {0}")]
    InvalidPullRequestList(String),

    #[error(
        "No recognized release label on any pull request ({}); add one of the configured labels (e.g. \"release: minor\") before releasing",
        format_numbers(.pull_requests)
    )]
    NoBumpLabel { pull_requests: Vec<u64> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_numbers(numbers: &[u64]) -> String {
    if numbers.is_empty() {
        return "no pull requests".to_string();
    }
    numbers
        .iter()
        .map(|n| format!("#{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience type alias for Results in pr-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create an error for a GitHub API response with a non-success status
    pub fn github(status: u16, message: impl Into<String>) -> Self {
        ReleaseError::GitHub {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_no_bump_label_lists_pull_requests() {
        let err = ReleaseError::NoBumpLabel {
            pull_requests: vec![3, 9],
        };
        let msg = err.to_string();
        assert!(msg.contains("#3, #9"));
        assert!(msg.contains("release: minor"));
    }

    #[test]
    fn test_no_bump_label_without_pull_requests() {
        let err = ReleaseError::NoBumpLabel {
            pull_requests: vec![],
        };
        assert!(err.to_string().contains("no pull requests"));
    }

    #[test]
    fn test_github_error_carries_status() {
        let err = ReleaseError::github(422, "Validation Failed");
        assert_eq!(
            err.to_string(),
            "GitHub API returned 422: Validation Failed"
        );
    }

    #[test]
    fn test_tag_exists_message() {
        let err = ReleaseError::TagExists("1.2.0".to_string());
        assert_eq!(err.to_string(), "Tag '1.2.0' already exists");
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::version("x"), "Version parsing error"),
            (ReleaseError::tag("x"), "Tag error"),
            (ReleaseError::remote("x"), "Remote operation failed"),
            (
                ReleaseError::InvalidPullRequestList("x".to_string()),
                "Invalid pull request list",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
