//! Main workflow orchestration logic
//!
//! Runs the release decision pipeline against any [HistoryStore] and any
//! collaborator implementing both GitHub traits, so the whole flow is
//! exercised in tests with mocks.

use std::env;
use std::time::Duration;

use tracing::{info, warn};

use crate::analyzer::{Classification, LabelClassifier};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{BumpCategory, ChangeSet, ReleaseTag};
use crate::error::{ReleaseError, Result};
use crate::git::HistoryStore;
use crate::github::client::DEFAULT_API_URL;
use crate::github::{
    GitHubClient, PublishedRelease, PullRequestSource, ReleaseTarget, RepositorySlug,
};
use crate::release::{
    changelog, read_baseline, release_title, resolver, Baseline, Changelog, ReleasePublisher,
    TagOutcome, TagPublisher, Trigger,
};

/// Options that do not come from the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Revision whose history is released
    pub target: String,

    /// Decide everything, change nothing
    pub dry_run: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        WorkflowOptions {
            target: "HEAD".to_string(),
            dry_run: false,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    /// Push trigger found no merged pull requests since the baseline
    NothingToRelease,

    /// The computed version was tagged by an earlier run
    AlreadyReleased {
        tag: ReleaseTag,
        category: BumpCategory,
    },

    /// Dry run: what would have been tagged and published
    DryRun {
        tag: ReleaseTag,
        category: BumpCategory,
        changelog: Changelog,
    },

    /// Tag created, pushed, and release record published
    Released {
        tag: ReleaseTag,
        category: BumpCategory,
        release: PublishedRelease,
    },
}

/// Outcome plus the decisions that led to it
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub baseline: Baseline,
    pub change_set: ChangeSet,
    /// `None` when there was nothing to classify
    pub classification: Option<Classification>,
    pub result: WorkflowResult,
    pub warnings: Vec<BoundaryWarning>,
}

/// Main release workflow
///
/// 1. Fetch remote tags (optional, failure is only a warning)
/// 2. Read the baseline release
/// 3. Resolve the change set for the trigger
/// 4. Classify and bump the version
/// 5. Create and push the tag unless it exists
/// 6. Render the changelog and publish the release for a new tag only
pub fn run_release_workflow<H, G>(
    trigger: &Trigger,
    options: &WorkflowOptions,
    config: &Config,
    history: &H,
    github: &G,
) -> Result<WorkflowReport>
where
    H: HistoryStore,
    G: PullRequestSource + ReleaseTarget,
{
    let mut warnings = Vec::new();
    let remote = config.release.remote.as_str();
    let pattern = config.tag_pattern()?;

    if config.release.fetch_tags {
        if let Err(e) = history.fetch_tags(remote) {
            warn!(remote, error = %e, "could not fetch tags, using local tags");
            warnings.push(BoundaryWarning::FetchFailed {
                remote: remote.to_string(),
                reason: e.to_string(),
            });
        }
    }

    let tip = history.resolve_commit(&options.target)?;
    let baseline = read_baseline(history, &pattern, tip)?;

    let resolution = resolver::resolve(trigger, history, github, &baseline, tip)?;
    warnings.extend(resolution.warnings);
    let change_set = resolution.change_set;

    if change_set.is_empty() && *trigger == Trigger::Push {
        info!(baseline = %baseline.version, "no merged pull requests since baseline");
        return Ok(WorkflowReport {
            baseline,
            change_set,
            classification: None,
            result: WorkflowResult::NothingToRelease,
            warnings,
        });
    }

    let classification = LabelClassifier::new(&config.labels).classify(&change_set)?;
    let version = baseline.version.bump(classification.category)?;
    info!(
        from = %baseline.version,
        to = %version,
        category = %classification.category,
        "computed next version"
    );

    let outcome = TagPublisher::new(history, &pattern, remote)
        .dry_run(options.dry_run)
        .publish(version, tip)?;

    let result = match outcome {
        TagOutcome::AlreadyExists(tag) => WorkflowResult::AlreadyReleased {
            tag,
            category: classification.category,
        },
        TagOutcome::Planned(tag) => WorkflowResult::DryRun {
            tag,
            category: classification.category,
            changelog: changelog::render(&change_set),
        },
        TagOutcome::Created(tag) => {
            let body = changelog::render(&change_set).body(&config.release.changelog_heading);
            let release = ReleasePublisher::new(github)
                .draft(config.release.draft)
                .create_release(&tag, &release_title(&tag.version), &body)?;
            WorkflowResult::Released {
                tag,
                category: classification.category,
                release,
            }
        }
    };

    Ok(WorkflowReport {
        baseline,
        change_set,
        classification: Some(classification),
        result,
        warnings,
    })
}

/// Where and as whom to talk to GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    pub api_url: String,
    pub repository: RepositorySlug,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GitHubSettings {
    /// Resolve settings from config, then environment, then the remote URL
    pub fn resolve(config: &Config, remote_url: Option<&str>) -> Result<Self> {
        let github = &config.github;

        let repository = match &github.repository {
            Some(slug) => RepositorySlug::parse(slug)?,
            None => match non_empty_var("GITHUB_REPOSITORY") {
                Some(slug) => RepositorySlug::parse(&slug)?,
                None => remote_url
                    .and_then(RepositorySlug::from_remote_url)
                    .ok_or_else(|| {
                        ReleaseError::config(
                            "Cannot determine the GitHub repository; set github.repository \
                             or GITHUB_REPOSITORY",
                        )
                    })?,
            },
        };

        let api_url = github
            .api_url
            .clone()
            .or_else(|| non_empty_var("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = non_empty_var(&github.token_env);
        if token.is_none() {
            warn!(variable = %github.token_env, "no GitHub token set, requests are anonymous");
        }

        Ok(GitHubSettings {
            api_url,
            repository,
            token,
            timeout: Duration::from_secs(github.timeout_secs),
        })
    }

    pub fn client(&self) -> Result<GitHubClient> {
        GitHubClient::new(
            self.api_url.as_str(),
            self.repository.clone(),
            self.token.clone(),
            self.timeout,
        )
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PullRequestRef, Version};
    use crate::git::mock::{mock_oid, MockHistory};
    use crate::github::MockGitHub;

    fn pr(number: u64, label: &str) -> PullRequestRef {
        PullRequestRef::new(
            number,
            format!("Change {}", number),
            "octocat",
            format!("https://github.com/o/r/pull/{}", number),
        )
        .with_label(label)
    }

    #[test]
    fn test_fetch_failure_is_a_warning() {
        let mut history = MockHistory::linear(2);
        history.fail_fetch("network unreachable");
        let mut github = MockGitHub::new();
        github.add_pull_request(pr(4, "release: patch"));
        github.add_merge(mock_oid(2), 4);

        let report = run_release_workflow(
            &Trigger::Push,
            &WorkflowOptions::default(),
            &Config::default(),
            &history,
            &github,
        )
        .unwrap();

        assert!(matches!(report.result, WorkflowResult::Released { .. }));
        assert!(matches!(
            report.warnings[0],
            BoundaryWarning::FetchFailed { .. }
        ));
    }

    #[test]
    fn test_fetch_can_be_disabled() {
        let history = MockHistory::linear(1);
        let github = MockGitHub::new();
        let mut config = Config::default();
        config.release.fetch_tags = false;

        let report = run_release_workflow(
            &Trigger::Push,
            &WorkflowOptions::default(),
            &config,
            &history,
            &github,
        )
        .unwrap();

        assert_eq!(history.fetch_count(), 0);
        assert!(matches!(
            report.result,
            WorkflowResult::NothingToRelease
        ));
    }

    #[test]
    fn test_release_body_uses_configured_heading() {
        let history = MockHistory::linear(1);
        let mut github = MockGitHub::new();
        github.add_pull_request(pr(1, "release: minor"));
        github.add_merge(mock_oid(1), 1);
        let mut config = Config::default();
        config.release.changelog_heading = "## Changes".to_string();
        config.release.draft = true;

        let report = run_release_workflow(
            &Trigger::Push,
            &WorkflowOptions::default(),
            &config,
            &history,
            &github,
        )
        .unwrap();

        let WorkflowResult::Released { tag, .. } = report.result else {
            panic!("expected a release, got {:?}", report.result);
        };
        assert_eq!(tag.version, Version::new(0, 1, 0));

        let releases = github.releases();
        assert_eq!(releases.len(), 1);
        assert!(releases[0].body.starts_with("## Changes\n\n- Change 1"));
        assert_eq!(releases[0].title, "Release 0.1.0");
        assert!(releases[0].draft);
    }

    #[test]
    fn test_unknown_target_is_error() {
        let history = MockHistory::linear(1);
        let github = MockGitHub::new();
        let options = WorkflowOptions {
            target: "no-such-branch".to_string(),
            dry_run: false,
        };

        assert!(run_release_workflow(
            &Trigger::Push,
            &options,
            &Config::default(),
            &history,
            &github
        )
        .is_err());
    }
}
