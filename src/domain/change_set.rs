use crate::domain::PullRequestRef;
use std::collections::HashSet;

/// Pull requests in scope for a release
///
/// Keeps insertion order and holds each pull request number at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: Vec<PullRequestRef>,
    seen: HashSet<u64>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pull request; returns `false` if its number is already present
    pub fn insert(&mut self, pull_request: PullRequestRef) -> bool {
        if !self.seen.insert(pull_request.number) {
            return false;
        }
        self.entries.push(pull_request);
        true
    }

    pub fn contains(&self, number: u64) -> bool {
        self.seen.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PullRequestRef> {
        self.entries.iter()
    }

    /// Pull request numbers in insertion order
    pub fn numbers(&self) -> Vec<u64> {
        self.entries.iter().map(|pr| pr.number).collect()
    }
}

impl FromIterator<PullRequestRef> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = PullRequestRef>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        for pr in iter {
            set.insert(pr);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a PullRequestRef;
    type IntoIter = std::slice::Iter<'a, PullRequestRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
