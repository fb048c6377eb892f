use crate::domain::{BumpCategory, ChangeSet, PullRequestRef};
use crate::error::{ReleaseError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Outcome of classifying a change set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: BumpCategory,
    /// First pull request (in change set order) carrying the winning category
    pub decided_by: u64,
}

/// Maps pull request labels to a bump category, highest severity wins
pub struct LabelClassifier {
    table: HashMap<String, BumpCategory>,
}

fn normalize(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

impl LabelClassifier {
    /// Create a classifier from a label-name to category table
    ///
    /// Label names are compared trimmed and ASCII case-insensitively. If two
    /// configured names collapse to the same key, the more severe one is kept.
    pub fn new(labels: &HashMap<String, BumpCategory>) -> Self {
        let mut table: HashMap<String, BumpCategory> = HashMap::new();
        for (label, category) in labels {
            let entry = table.entry(normalize(label)).or_insert(*category);
            *entry = (*entry).max(*category);
        }
        LabelClassifier { table }
    }

    /// The pull request's own most severe recognized label, if any
    pub fn category_for(&self, pull_request: &PullRequestRef) -> Option<BumpCategory> {
        pull_request
            .labels
            .iter()
            .filter_map(|label| self.table.get(&normalize(label)).copied())
            .max()
    }

    /// Classify the whole change set
    ///
    /// # Errors
    /// [ReleaseError::NoBumpLabel] when no pull request carries a recognized
    /// label. No default category is ever assumed.
    pub fn classify(&self, change_set: &ChangeSet) -> Result<Classification> {
        let mut best: Option<Classification> = None;

        for pull_request in change_set {
            let category = self.category_for(pull_request);
            debug!(
                pull_request = pull_request.number,
                category = ?category,
                "classified pull request"
            );

            if let Some(category) = category {
                if best.map_or(true, |b| category > b.category) {
                    best = Some(Classification {
                        category,
                        decided_by: pull_request.number,
                    });
                }
            }
        }

        best.ok_or_else(|| ReleaseError::NoBumpLabel {
            pull_requests: change_set.numbers(),
        })
    }
}
