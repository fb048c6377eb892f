use crate::boundary::BoundaryWarning;
use crate::domain::{parse_pull_request_list, ChangeSet};
use crate::error::Result;
use crate::git::HistoryStore;
use crate::github::PullRequestSource;
use crate::release::Baseline;
use git2::Oid;
use tracing::{debug, info};

/// What started this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Push to the release branch: walk history since the baseline
    Push,
    /// Operator-supplied pull request numbers, duplicates allowed
    Manual(Vec<u64>),
}

impl Trigger {
    /// Build a manual trigger from a comma-separated list
    pub fn manual(input: &str) -> Result<Self> {
        Ok(Trigger::Manual(parse_pull_request_list(input)?))
    }
}

/// A resolved change set plus the non-fatal issues met along the way
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub change_set: ChangeSet,
    pub warnings: Vec<BoundaryWarning>,
}

/// Resolve the change set for `trigger`
pub fn resolve<H, P>(
    trigger: &Trigger,
    history: &H,
    source: &P,
    baseline: &Baseline,
    tip: Oid,
) -> Result<Resolution>
where
    H: HistoryStore,
    P: PullRequestSource,
{
    match trigger {
        Trigger::Push => resolve_from_history(history, source, baseline, tip),
        Trigger::Manual(numbers) => resolve_from_list(source, numbers),
    }
}

/// Walk first-parent history from the baseline to `tip` and collect the
/// merged pull request behind each commit
pub fn resolve_from_history<H, P>(
    history: &H,
    source: &P,
    baseline: &Baseline,
    tip: Oid,
) -> Result<Resolution>
where
    H: HistoryStore,
    P: PullRequestSource,
{
    let commits = history.first_parent_commits(baseline.exclusive_start(), tip)?;
    info!(commits = commits.len(), "walking first-parent history");

    let mut resolution = Resolution::default();
    for commit in commits {
        let mut candidates = source.merged_pull_requests_for_commit(commit)?;
        if candidates.is_empty() {
            debug!(%commit, "commit has no merged pull request");
            continue;
        }

        // first match wins; search order is the only tie-breaker available
        if candidates.len() > 1 {
            resolution.warnings.push(BoundaryWarning::AmbiguousCommit {
                commit: commit.to_string(),
                chosen: candidates[0].number,
                candidates: candidates.iter().map(|pr| pr.number).collect(),
            });
        }
        let pull_request = candidates.swap_remove(0);
        let number = pull_request.number;
        if !resolution.change_set.insert(pull_request) {
            debug!(%commit, pull_request = number, "pull request already in change set");
        }
    }

    Ok(resolution)
}

/// Fetch each operator-supplied pull request, dropping repeats
pub fn resolve_from_list<P: PullRequestSource>(source: &P, numbers: &[u64]) -> Result<Resolution> {
    let mut resolution = Resolution::default();

    for &number in numbers {
        if resolution.change_set.contains(number) {
            debug!(pull_request = number, "duplicate pull request in manual list");
            continue;
        }
        let details = source.pull_request(number)?;
        if !details.merged {
            resolution
                .warnings
                .push(BoundaryWarning::UnmergedPullRequest { number });
        }
        resolution.change_set.insert(details.pull_request);
    }

    Ok(resolution)
}
