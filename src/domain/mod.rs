//! Domain logic - pure release rules independent of git and GitHub

pub mod change_set;
pub mod pull_request;
pub mod tag;
pub mod version;

pub use change_set::ChangeSet;
pub use pull_request::{parse_pull_request_list, PullRequestRef};
pub use tag::{ReleaseTag, TagPattern};
pub use version::{BumpCategory, Version};
